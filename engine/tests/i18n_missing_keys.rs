use std::collections::{BTreeSet, HashSet};

/// Every non-fallback locale must define at least the keys of en-US.
///
/// Only `key = value` lines are inspected; comments, attributes and
/// continuation lines are skipped.
#[test]
fn all_locales_have_all_fallback_keys() {
    const EN_US: &str = include_str!("../i18n/en-US/probelab-engine.ftl");
    const MN_MN: &str = include_str!("../i18n/mn-MN/probelab-engine.ftl");

    let fallback_keys = extract_keys(EN_US);
    assert!(!fallback_keys.is_empty(), "en-US defines no keys");
    assert_no_dup_keys(EN_US, "en-US");

    let locales: &[(&str, &str)] = &[("mn-MN", MN_MN)];

    let mut failures = Vec::new();
    for (locale, src) in locales {
        assert_no_dup_keys(src, locale);
        let keys = extract_keys(src);
        let missing: BTreeSet<&String> = fallback_keys
            .iter()
            .filter(|k| !keys.contains(*k))
            .collect();
        if !missing.is_empty() {
            failures.push(format!(
                "{locale} is missing {} key(s):\n  {}",
                missing.len(),
                missing.into_iter().cloned().collect::<Vec<_>>().join("\n  ")
            ));
        }
    }

    if !failures.is_empty() {
        panic!("locale completeness check failed:\n\n{}", failures.join("\n\n"));
    }
}

#[test]
fn embedded_languages_match_locale_dirs() {
    let langs = engine::i18n::available_languages();
    assert_eq!(langs, vec!["en-US".to_string(), "mn-MN".to_string()]);
}

/// `fl!` resolves `<domain>.ftl` at compile time; the domain must name the
/// shipped files rather than default to the underscored crate name.
#[test]
fn configured_domain_names_the_locale_files() {
    const CONFIG: &str = include_str!("../i18n.toml");
    let domain = CONFIG
        .lines()
        .filter_map(|line| line.split_once('='))
        .find(|(key, _)| key.trim() == "domain")
        .map(|(_, value)| value.trim().trim_matches('"'))
        .expect("i18n.toml sets a fluent domain");
    assert_eq!(domain, "probelab-engine");

    let manifest = std::path::Path::new(env!("CARGO_MANIFEST_DIR"));
    for locale in ["en-US", "mn-MN"] {
        let file = manifest.join("i18n").join(locale).join(format!("{domain}.ftl"));
        assert!(file.is_file(), "missing {}", file.display());
    }
    assert_eq!(engine::results::TaskKind::Stroop.label(), "Emotional Stroop");
}

fn is_message_key(key: &str) -> bool {
    !key.is_empty()
        && !key.contains(' ')
        && !key.contains('\t')
        && !key.starts_with('[')
        && !key.starts_with('-')
}

fn extract_keys(src: &str) -> HashSet<String> {
    src.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#') && !line.starts_with('.'))
        .filter_map(|line| line.split_once('=').map(|(key, _)| key.trim()))
        .filter(|key| is_message_key(key))
        .map(str::to_string)
        .collect()
}

fn assert_no_dup_keys(src: &str, locale: &str) {
    let mut seen = HashSet::new();
    let mut dups = BTreeSet::new();
    for (number, raw) in src.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with('.') {
            continue;
        }
        if let Some((key, _)) = line.split_once('=') {
            let key = key.trim();
            if is_message_key(key) && !seen.insert(key.to_string()) {
                dups.insert(format!("{key} (line {})", number + 1));
            }
        }
    }
    assert!(dups.is_empty(), "duplicate keys in {locale}: {dups:?}");
}
