mod common;

use beliefgrid::game::Script;
use beliefgrid::infra::{
    JointPosition, P1Action, P2Action, Position, SimulationConfig, parse_script,
};
use beliefgrid::planners::HiddenType;
use beliefgrid::state::EpisodeHistory;

use common::setup;

#[test]
fn test_cooperative_player2_reaches_green_cell() {
    let config = SimulationConfig::default();
    let gamma = config.player1.gamma;
    let (mut game, mut agents, mut rng, _) = setup(config, 1);
    agents.player2.force_type(Some(HiddenType::Cooperative));

    // (3, 3) -> (3, 2) -> (4, 2) -> (4, 1) -> (4, 0), then wait on green
    let script = Script {
        player1: vec![P1Action::Stay; 10],
        player2: parse_script("N E N N 0 0 0 0 0 0").unwrap(),
    };
    let green_turn = JointPosition::new(Position::new(2, 2), Position::new(4, 1));
    let on_green = JointPosition::new(Position::new(2, 2), Position::new(4, 0));

    let mut history = EpisodeHistory::new();
    for episode in 0..5 {
        let q2_old = agents.player2.q_value(&green_turn, P2Action::North);
        let q2_target = 1.0 + agents.player2.max_q(&on_green) * 0.9;

        let outcome = game
            .play_scripted_episode(episode, agents, history, &script, &mut rng)
            .unwrap();
        agents = outcome.agents;
        history = outcome.history;

        let record = game.trajectory().episode(episode).unwrap();
        assert_eq!(record.turns.len(), 10);

        let turn = &record.turns[3];
        assert_eq!(turn.p2t, Position::new(4, 1));
        assert_eq!(turn.a2t, P2Action::North);
        assert_eq!((turn.r1, turn.r2), (1.0, 1.0));
        for (i, other) in record.turns.iter().enumerate().take(3) {
            assert_eq!((other.r1, other.r2), (0.0, 0.0), "turn {}", i);
        }

        // Q2 moves strictly toward its bootstrapped target
        assert!((turn.q2 - q2_target).abs() < (q2_old - q2_target).abs());

        // Q1[(Stay, North)] was last touched on turn 3 of this episode
        let q1_old = record.turns[2].q1;
        let likelihood = 2.0 * 0.2f64.powi(3);
        let q1_target = 1.0 + gamma * likelihood * turn.vi1.max();
        assert!((turn.q1 - q1_target).abs() < (q1_old - q1_target).abs());
    }
}

#[test]
fn test_zap_next_to_competitive_player2_ends_episode() {
    let (mut game, mut agents, mut rng, observer) = setup(SimulationConfig::default(), 2);
    agents.player2.force_type(Some(HiddenType::Competitive));

    let script = Script {
        player1: vec![P1Action::Zap],
        player2: vec![P2Action::Stay],
    };
    let outcome = game
        .play_scripted_episode(0, agents, EpisodeHistory::new(), &script, &mut rng)
        .unwrap();

    let record = game.trajectory().episode(0).unwrap();
    assert_eq!(record.turns.len(), 1);
    assert_eq!((record.turns[0].r1, record.turns[0].r2), (0.0, 0.0));
    assert_eq!(record.turns[0].a1t, P1Action::Zap);

    // The terminating turn never enters the history
    assert_eq!(outcome.history.turns(), 0);
    assert!(outcome.summary.zapped);
    assert_eq!(observer.summaries().len(), 1);
}

#[test]
fn test_zap_next_to_cooperative_player2_punishes_both() {
    let config = SimulationConfig::default();
    let punishment = config.zap_punishment;
    let (mut game, mut agents, mut rng, _) = setup(config, 3);
    agents.player2.force_type(Some(HiddenType::Cooperative));

    // Zap only on the third turn; Player2 walks north twice first
    let script = Script {
        player1: vec![P1Action::Stay, P1Action::Stay, P1Action::Zap],
        player2: vec![P2Action::North, P2Action::Stay, P2Action::Stay],
    };
    let outcome = game
        .play_scripted_episode(0, agents, EpisodeHistory::new(), &script, &mut rng)
        .unwrap();

    let record = game.trajectory().episode(0).unwrap();
    assert_eq!(record.turns.len(), 3);
    assert_eq!(
        (record.turns[2].r1, record.turns[2].r2),
        (-punishment, -punishment)
    );
    assert_eq!(outcome.history.turns(), 2);
    assert_eq!(outcome.summary.turns, 3);
}

#[test]
fn test_zap_out_of_reach_does_not_end_episode() {
    let (mut game, mut agents, mut rng, _) = setup(SimulationConfig::default(), 4);
    agents.player2.force_type(Some(HiddenType::Competitive));

    // Player1 walks east to (5, 2) while Player2 walks west to (0, 3)
    let script = Script {
        player1: parse_script("E E E Z 0 0 0 0 0 0").unwrap(),
        player2: parse_script("W W W 0").unwrap(),
    };
    game.play_scripted_episode(0, agents, EpisodeHistory::new(), &script, &mut rng)
        .unwrap();

    let record = game.trajectory().episode(0).unwrap();
    assert_eq!(record.turns[3].p1t, Position::new(5, 2));
    assert_eq!(record.turns[3].p2t, Position::new(0, 3));
    assert_eq!(record.turns.len(), 10);
}
