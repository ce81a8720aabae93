use embedtag_core::{VersionTriple, EXPRESS_INSTALL_MIN_VERSION};

#[test]
fn is_at_least_reference_cases() {
    assert!(VersionTriple::new(6, 0, 65).is_at_least(&VersionTriple::new(6, 0, 65)));
    assert!(!VersionTriple::new(5, 9, 9).is_at_least(&VersionTriple::new(6, 0, 0)));
    assert!(VersionTriple::new(7, 0, 0).is_at_least(&VersionTriple::new(6, 0, 65)));
}

#[test]
fn higher_level_decides_before_lower_levels() {
    assert!(VersionTriple::new(7, 0, 0).is_at_least(&VersionTriple::new(6, 9, 999)));
    assert!(!VersionTriple::new(6, 0, 999).is_at_least(&VersionTriple::new(6, 1, 0)));
}

#[test]
fn parse_is_lenient() {
    assert_eq!("9.0.115".parse::<VersionTriple>().unwrap(), VersionTriple::new(9, 0, 115));
    assert_eq!(VersionTriple::parse("abc"), VersionTriple::new(0, 0, 0));
    assert_eq!(VersionTriple::parse("8..3"), VersionTriple::new(8, 0, 3));
}

#[test]
fn serializes_as_dotted_string() {
    let json = serde_json::to_value(EXPRESS_INSTALL_MIN_VERSION).unwrap();
    assert_eq!(json, serde_json::json!("6.0.65"));

    let decoded: VersionTriple = serde_json::from_value(serde_json::json!("10.1.53")).unwrap();
    assert_eq!(decoded, VersionTriple::new(10, 1, 53));
}
