use cruzeiro_stats::participation::{
    count_participation, is_ignored, mentions, normalize, tokenize,
};

#[test]
fn counts_exact_matches_and_skips_ignored_tokens() {
    let field = "João; Penalti João; joão ";
    assert_eq!(count_participation(Some(field), &normalize("João")), 2);
}

#[test]
fn ignore_term_alone_never_counts() {
    for target in ["penalti", "ana", "penalti joão"] {
        assert_eq!(count_participation(Some("Penalti"), target), 0);
    }
}

#[test]
fn missing_field_or_empty_target_counts_zero() {
    assert_eq!(count_participation(None, "ana"), 0);
    assert_eq!(count_participation(Some("Ana; Ana"), ""), 0);
    assert_eq!(count_participation(Some(""), "ana"), 0);
}

#[test]
fn target_match_is_whole_token_not_substring() {
    assert_eq!(count_participation(Some("Ana Paula; Mariana"), "ana"), 0);
    assert_eq!(count_participation(Some("Ana Paula; Mariana"), "ana paula"), 1);
}

#[test]
fn repeated_player_in_one_field_counts_each_time() {
    assert_eq!(count_participation(Some("Ana;Ana; ANA ;Bia"), "ana"), 3);
}

#[test]
fn ignore_filter_uses_substring_containment() {
    assert!(is_ignored("penalti"));
    assert!(is_ignored("sem assistência"));
    assert!(is_ignored("gol contra (zagueiro)"));
    assert!(is_ignored("cobrança de falta"));
    assert!(!is_ignored("ana"));
    assert!(!is_ignored("gol"));
}

#[test]
fn normalizing_is_idempotent() {
    for name in ["  Ana Paula ", "JOÃO", "bia", "", "Assistências"] {
        let once = normalize(name);
        assert_eq!(normalize(&once), once);
    }
    assert_eq!(normalize("  Ana Paula "), "ana paula");
    assert_eq!(normalize(" Assistências"), "assistências");
}

#[test]
fn tokenize_trims_drops_empty_parts_and_keeps_casing() {
    let tokens = tokenize(" Ana ;; Bia; ;Gol contra");
    let raw: Vec<&str> = tokens.iter().map(|token| token.raw_name.as_str()).collect();
    assert_eq!(raw, vec!["Ana", "Bia", "Gol contra"]);
    assert_eq!(tokens[0].normalized_name, "ana");
    assert!(tokens[0].is_countable());
    assert!(!tokens[2].is_countable());
}

#[test]
fn nan_placeholder_is_not_countable() {
    let tokens = tokenize("nan; NaN");
    assert!(tokens.iter().all(|token| !token.is_countable()));
}

#[test]
fn mentions_is_case_insensitive_substring() {
    assert!(mentions(Some("Ana Paula; Bia"), "ana"));
    assert!(mentions(Some("ana paula"), "Ana Paula"));
    assert!(!mentions(Some("Bia"), "ana"));
    assert!(!mentions(None, "ana"));
}
