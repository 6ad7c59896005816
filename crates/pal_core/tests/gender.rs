use pal_core::gender::Gender;

#[test]
fn maps_known_gender_values() {
    assert_eq!(Gender::from_raw("EPalGenderType::Male"), Some(Gender::Male));
    assert_eq!(Gender::from_raw("EPalGenderType::Female"), Some(Gender::Female));
}

#[test]
fn preserves_unknown_values() {
    let gender = Gender::from_raw("EPalGenderType::None").expect("has separator");
    assert_eq!(gender, Gender::Unknown("None".to_string()));
    assert_eq!(gender.to_string(), "None");
}

#[test]
fn rejects_values_without_separator() {
    assert_eq!(Gender::from_raw("Male"), None);
}

#[test]
fn serializes_as_plain_name() {
    let json = serde_json::to_string(&Gender::Female).expect("serialize");
    assert_eq!(json, "\"Female\"");
    let back: Gender = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(back, Gender::Female);
}
