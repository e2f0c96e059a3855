//! Parse the example control script shipped with the workspace

use bodies::prelude::BodyKind;
use controls::*;

const SCRIPT: &str = include_str!("../../scripts/grand_tour.txt");

#[test]
fn grand_tour_script() {
    let mut script = parse_control_script(SCRIPT).unwrap();
    assert_eq!(script.entries().len(), 15);
    assert_eq!(script.last_frame(), Some(720));

    let nexts = script
        .entries()
        .iter()
        .filter(|e| e.command == ControlCommand::FocusNext)
        .count();
    assert_eq!(nexts, 9);

    assert_eq!(script.due(0), vec![ControlCommand::Speed(2)]);
    assert!(script.due(59).is_empty());
    assert_eq!(
        script.due(240),
        vec![
            ControlCommand::FocusNext,
            ControlCommand::FocusNext,
            ControlCommand::FocusNext,
            ControlCommand::FocusNext,
            ControlCommand::Speed(10),
        ]
    );
    assert_eq!(
        script.due(660).last(),
        Some(&ControlCommand::Focus(BodyKind::Sun))
    );
    assert!(!script.is_finished());
    assert_eq!(
        script.due(u64::MAX),
        vec![ControlCommand::Resize {
            width: 1280,
            height: 720
        }]
    );
    assert!(script.is_finished());
}
