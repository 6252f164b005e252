//! Locale files against each other and against the `t!` call sites.
//!
//! Messages are single-line `id = pattern` entries; the parser below only
//! understands that shape and fails loudly on anything else.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

const EN_US: &str = include_str!("../i18n/en-US/feedback-radar-ui.ftl");
const NL_NL: &str = include_str!("../i18n/nl-NL/feedback-radar-ui.ftl");

/// Message id → placeholder names used in its pattern.
type Catalog = BTreeMap<String, BTreeSet<String>>;

fn catalog(locale: &str, src: &str) -> Catalog {
    let mut messages = Catalog::new();
    for (n, line) in src.lines().enumerate() {
        if line.trim().is_empty() || line.starts_with('#') {
            continue;
        }
        let (id, pattern) = line
            .split_once('=')
            .unwrap_or_else(|| panic!("{locale}:{}: not a message: {line:?}", n + 1));
        let id = id.trim();
        assert!(
            !id.is_empty() && id.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'),
            "{locale}:{}: bad message id {id:?}",
            n + 1
        );
        let previous = messages.insert(id.to_string(), placeholders(pattern));
        assert!(previous.is_none(), "{locale}: {id} defined twice");
    }
    messages
}

/// Names of `{ $var }` placeholders in a pattern.
fn placeholders(pattern: &str) -> BTreeSet<String> {
    pattern
        .split('$')
        .skip(1)
        .map(|rest| {
            rest.chars()
                .take_while(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '-')
                .collect::<String>()
        })
        .filter(|name| !name.is_empty())
        .collect()
}

/// Literal ids passed to `t!` anywhere under `dir`.
fn used_ids(dir: &Path, out: &mut BTreeSet<String>) {
    for entry in fs::read_dir(dir).expect("read src dir").flatten() {
        let path = entry.path();
        if path.is_dir() {
            used_ids(&path, out);
            continue;
        }
        if path.extension().and_then(|e| e.to_str()) != Some("rs") {
            continue;
        }
        let source = fs::read_to_string(&path).expect("read source file");
        let mut rest = source.as_str();
        while let Some(pos) = rest.find("t!(\"") {
            let preceded_by_ident = rest[..pos]
                .chars()
                .next_back()
                .is_some_and(|c| c.is_alphanumeric() || c == '_');
            rest = &rest[pos + 4..];
            if preceded_by_ident {
                continue;
            }
            if let Some(end) = rest.find('"') {
                out.insert(rest[..end].to_string());
                rest = &rest[end..];
            }
        }
    }
}

#[test]
fn locales_define_the_same_messages() {
    let en = catalog("en-US", EN_US);
    let nl = catalog("nl-NL", NL_NL);
    assert!(!en.is_empty());

    let en_ids: BTreeSet<_> = en.keys().collect();
    let nl_ids: BTreeSet<_> = nl.keys().collect();
    let only_en: Vec<_> = en_ids.difference(&nl_ids).collect();
    let only_nl: Vec<_> = nl_ids.difference(&en_ids).collect();
    assert!(only_en.is_empty(), "missing in nl-NL: {only_en:?}");
    assert!(only_nl.is_empty(), "unknown to en-US: {only_nl:?}");
}

#[test]
fn translations_keep_placeholders() {
    let en = catalog("en-US", EN_US);
    let nl = catalog("nl-NL", NL_NL);

    let mismatched: Vec<String> = en
        .iter()
        .filter_map(|(id, vars)| {
            let other = nl.get(id)?;
            (other != vars).then(|| format!("{id}: en-US {vars:?} vs nl-NL {other:?}"))
        })
        .collect();
    assert!(mismatched.is_empty(), "placeholder drift:\n{}", mismatched.join("\n"));
}

#[test]
fn every_used_id_has_a_message() {
    let en = catalog("en-US", EN_US);
    let mut used = BTreeSet::new();
    used_ids(&Path::new(env!("CARGO_MANIFEST_DIR")).join("src"), &mut used);

    assert!(used.contains("chart-fallback-heading"), "scan found {used:?}");
    let missing: Vec<_> = used.iter().filter(|id| !en.contains_key(*id)).collect();
    assert!(missing.is_empty(), "t! ids without an en-US message: {missing:?}");
}

#[test]
fn placeholder_names_are_read_from_patterns() {
    assert_eq!(
        placeholders(" Could not draw { $name }: { $error }"),
        BTreeSet::from(["name".to_string(), "error".to_string()])
    );
    assert!(placeholders(" Team average").is_empty());
}
