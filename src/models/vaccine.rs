//! Canonical vaccine names and manufacturer-alias normalization.
//!
//! Source feeds spell manufacturers inconsistently ("AZ", "astra",
//! "astra-zeneca", ...). All per-vaccine keys inside the library are the
//! canonical short names below; the declaration order is also the fixed
//! precedence in which stockpile is allocated to first doses.

use lazy_static::lazy_static;
use rustc_hash::FxHashMap;

/// Canonical vaccine names with their known manufacturer aliases.
pub const VACCINE_ALIASES: &[(&str, &[&str])] = &[
    ("biontech", &["comirnaty", "BNT/Pfizer"]),
    ("moderna", &["Moderna"]),
    ("az", &["AZ", "astra", "astrazeneca", "astra-zeneca"]),
    ("j&j", &["J&J", "janssen"]),
    ("curevac", &["Curevac"]),
    ("sanofi", &["Sanofi/GSK"]),
];

lazy_static! {
    static ref TRANSLATION: FxHashMap<&'static str, &'static str> = {
        let mut table = FxHashMap::default();
        for (canonical, aliases) in VACCINE_ALIASES {
            table.insert(*canonical, *canonical);
            for alias in *aliases {
                table.insert(*alias, *canonical);
            }
        }
        table
    };
}

/// Fold a raw manufacturer name onto its canonical key.
///
/// Unknown names pass through unchanged; the miss is logged because it
/// usually means a new manufacturer appeared in the source feed.
#[must_use]
pub fn normalize_vaccine_name(name: &str) -> String {
    match TRANSLATION.get(name) {
        Some(canonical) => (*canonical).to_string(),
        None => {
            log::warn!("unknown vaccine name: {name}");
            name.to_string()
        }
    }
}

/// Canonical names in allocation priority order.
#[must_use]
pub fn canonical_vaccine_names() -> Vec<&'static str> {
    VACCINE_ALIASES
        .iter()
        .map(|(canonical, _)| *canonical)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aliases_fold_onto_canonical_names() {
        assert_eq!(normalize_vaccine_name("astra"), "az");
        assert_eq!(normalize_vaccine_name("astra-zeneca"), "az");
        assert_eq!(normalize_vaccine_name("comirnaty"), "biontech");
        assert_eq!(normalize_vaccine_name("janssen"), "j&j");
        // canonical names map to themselves
        assert_eq!(normalize_vaccine_name("moderna"), "moderna");
    }

    #[test]
    fn unknown_names_pass_through() {
        assert_eq!(normalize_vaccine_name("novavax"), "novavax");
    }

    #[test]
    fn priority_order_starts_with_the_main_vaccines() {
        let names = canonical_vaccine_names();
        assert_eq!(names[0], "biontech");
        assert_eq!(names[1], "moderna");
        assert!(names.contains(&"j&j"));
    }
}
