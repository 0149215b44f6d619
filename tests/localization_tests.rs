use fittrack::localization::{init_localization, t_args_lang, t_lang};

#[test]
fn test_known_keys_resolve() {
    init_localization().unwrap();

    assert_eq!(t_lang("welcome-title", None), "Welcome to FitTrack!");
    assert!(t_lang("register-username-prompt", Some("en")).contains("username"));
}

#[test]
fn test_unknown_language_falls_back_to_english() {
    init_localization().unwrap();

    assert_eq!(
        t_lang("welcome-title", Some("de-DE")),
        t_lang("welcome-title", Some("en"))
    );
}

#[test]
fn test_missing_key_is_marked() {
    init_localization().unwrap();

    assert_eq!(
        t_lang("no-such-key", None),
        "Missing translation: no-such-key"
    );
}

#[test]
fn test_arguments_are_substituted() {
    init_localization().unwrap();

    let message = t_args_lang("welcome-back", &[("username", "alice")], None);
    assert!(message.contains("alice"), "got: {message}");

    let saved = t_args_lang(
        "meal-saved",
        &[("name", "oatmeal"), ("calories", "450")],
        None,
    );
    assert!(saved.contains("oatmeal"));
    assert!(saved.contains("450"));
}
