// Property-based tests for color resolution and tinting.
// CI: 256 cases (default). Soak: PROPTEST_CASES=10000 cargo test --release

use proptest::prelude::*;
use sheetprint_extract::{apply_tint, resolve, ThemeColorTable};
use sheetprint_model::ColorRef;

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

fn config_256() -> ProptestConfig {
    ProptestConfig {
        cases: std::env::var("PROPTEST_CASES")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(256),
        failure_persistence: None,
        ..ProptestConfig::default()
    }
}

// ---------------------------------------------------------------------------
// Generators
// ---------------------------------------------------------------------------

fn arb_rgb() -> impl Strategy<Value = [u8; 3]> {
    (any::<u8>(), any::<u8>(), any::<u8>()).prop_map(|(r, g, b)| [r, g, b])
}

fn hex_of(rgb: [u8; 3]) -> String {
    format!("#{:02X}{:02X}{:02X}", rgb[0], rgb[1], rgb[2])
}

fn channels(hex: &str) -> [u8; 3] {
    let s = hex.trim_start_matches('#');
    [
        u8::from_str_radix(&s[0..2], 16).unwrap(),
        u8::from_str_radix(&s[2..4], 16).unwrap(),
        u8::from_str_radix(&s[4..6], 16).unwrap(),
    ]
}

fn table_with(slot: usize, base: &str) -> ThemeColorTable {
    ThemeColorTable::from_entries([(slot, base.to_string())])
}

// ---------------------------------------------------------------------------
// Direct RGB
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(config_256())]

    #[test]
    fn argb_drops_alpha_and_uppercases(hex in "[0-9a-fA-F]{8}") {
        let got = resolve(&ColorRef::rgb(hex.clone()), &ThemeColorTable::default());
        prop_assert_eq!(got, Some(format!("#{}", hex[2..].to_ascii_uppercase())));
    }

    #[test]
    fn rgb_passes_through_uppercased(hex in "[0-9a-fA-F]{6}") {
        let got = resolve(&ColorRef::rgb(hex.clone()), &ThemeColorTable::default());
        prop_assert_eq!(got, Some(format!("#{}", hex.to_ascii_uppercase())));
    }

    #[test]
    fn other_lengths_unresolved(hex in "[0-9a-fA-F]{0,5}|[0-9a-fA-F]{7}|[0-9a-fA-F]{9,12}") {
        prop_assert_eq!(resolve(&ColorRef::rgb(hex), &ThemeColorTable::default()), None);
    }

    #[test]
    fn indexed_never_panics(idx in any::<u32>()) {
        let got = resolve(&ColorRef::Indexed(idx), &ThemeColorTable::default());
        prop_assert_eq!(got.is_some(), idx < 64);
    }
}

// ---------------------------------------------------------------------------
// Tint
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(config_256())]

    #[test]
    fn tint_zero_is_identity(rgb in arb_rgb(), slot in 0usize..12) {
        let theme = table_with(slot, &hex_of(rgb));
        let untinted = resolve(&ColorRef::theme(slot as u32), &theme);
        let zero = resolve(&ColorRef::tinted(slot as u32, 0.0), &theme);
        prop_assert_eq!(zero, untinted.clone());
        prop_assert_eq!(untinted, Some(hex_of(rgb)));
    }

    #[test]
    fn lightening_never_decreases(rgb in arb_rgb(), a in 0.0f64..=1.0, b in 0.0f64..=1.0) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        let base = hex_of(rgb);
        let at_lo = channels(&apply_tint(&base, Some(lo)));
        let at_hi = channels(&apply_tint(&base, Some(hi)));
        for i in 0..3 {
            prop_assert!(at_lo[i] >= rgb[i]);
            prop_assert!(at_hi[i] >= at_lo[i]);
        }
    }

    #[test]
    fn darkening_never_increases(rgb in arb_rgb(), a in -1.0f64..=0.0, b in -1.0f64..=0.0) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        let base = hex_of(rgb);
        let at_lo = channels(&apply_tint(&base, Some(lo)));
        let at_hi = channels(&apply_tint(&base, Some(hi)));
        for i in 0..3 {
            prop_assert!(at_hi[i] <= rgb[i]);
            prop_assert!(at_lo[i] <= at_hi[i]);
        }
    }

    #[test]
    fn any_tint_yields_valid_hex(rgb in arb_rgb(), tint in any::<f64>()) {
        let out = apply_tint(&hex_of(rgb), Some(tint));
        prop_assert_eq!(out.len(), 7);
        prop_assert!(out.starts_with('#'));
        prop_assert!(out[1..].bytes().all(|b| b.is_ascii_hexdigit()));
    }

    #[test]
    fn missing_slot_unresolved(slot in 0u32..64, tint in -1.0f64..=1.0) {
        let theme = table_with(0, "#FFFFFF");
        let got = resolve(&ColorRef::tinted(slot, tint), &theme);
        prop_assert_eq!(got.is_some(), slot == 0);
    }
}
