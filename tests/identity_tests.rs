// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use adpilot::identity::{
    ParsedIdentity, UNKNOWN, account, buying_method, category, channel_id, domain, locale,
};
use proptest::prelude::*;

#[test]
fn parses_full_name_with_locale() {
    let id = ParsedIdentity::parse("3-ch001_shop_auction_electronics_us_en");
    assert_eq!(id.account, "3");
    assert_eq!(id.channel_id, "ch001");
    assert_eq!(id.domain, "shop");
    assert_eq!(id.buying_method, "auction");
    assert_eq!(id.category, "electronics");
    assert_eq!(id.locale, "us_en");
    assert!(!id.is_degraded());
}

#[test]
fn locale_country_only_and_case() {
    assert_eq!(locale("1-c9_dom_bm_cat_US"), "us");
    assert_eq!(locale("1-c9_dom_bm_cat_US_EN"), "us_en");
    // language must directly follow the country
    assert_eq!(locale("1-c9_dom_bm_cat_de_v2_fr"), "de");
    // first two-letter token wins even after longer tokens
    assert_eq!(locale("1-c9_dom_bm_cat_promo_br_pt_x"), "br_pt");
    assert_eq!(locale("1-c9_dom_bm_cat_usa"), UNKNOWN);
    assert_eq!(locale("1-c9_dom_bm_cat_u1"), UNKNOWN);
    assert_eq!(locale("1-c9_dom_bm_cat"), UNKNOWN);
}

#[test]
fn account_requires_digit_then_dash() {
    assert_eq!(account("7-abc_x_y_z"), "7");
    assert_eq!(account("  7-abc_x_y_z"), "7");
    assert_eq!(account("x7-abc"), "");
    assert_eq!(account("77-abc"), "");
    assert_eq!(account("7abc"), "");
}

#[test]
fn partial_names_fill_what_they_can() {
    let name = "2-ch5_news";
    assert_eq!(account(name), "2");
    assert_eq!(channel_id(name), "ch5");
    assert_eq!(domain(name), "news");
    assert_eq!(buying_method(name), UNKNOWN);
    assert_eq!(category(name), UNKNOWN);
    assert!(ParsedIdentity::parse(name).is_degraded());
}

#[test]
fn garbage_names_degrade_to_sentinels() {
    for name in ["", "   ", "no convention here", "-_-_", "_3-ch_a_b_c", "é-ü_ß"] {
        let id = ParsedIdentity::parse(name);
        assert_eq!(id.account, "", "{name}");
        assert_eq!(id.channel_id, "", "{name}");
        assert_eq!(id.domain, UNKNOWN, "{name}");
        assert_eq!(id.buying_method, UNKNOWN, "{name}");
        assert_eq!(id.category, UNKNOWN, "{name}");
        assert_eq!(id.locale, UNKNOWN, "{name}");
        assert!(id.is_degraded());
    }
}

#[test]
fn default_identity_is_all_sentinels() {
    let id = ParsedIdentity::default();
    assert_eq!(id.account, "");
    assert_eq!(id.domain, UNKNOWN);
    assert_eq!(id.locale, UNKNOWN);
}

proptest! {
    #[test]
    fn tokens_reconstruct_the_name(
        acct in 0u8..10,
        ch in "[a-z0-9]{1,10}",
        dom in "[a-z0-9]{1,10}",
        bm in "[a-z]{1,8}",
        cat in "[a-z]{1,12}",
    ) {
        let name = format!("{}-{}_{}_{}_{}", acct, ch, dom, bm, cat);
        let id = ParsedIdentity::parse(&name);
        let rebuilt = format!(
            "{}-{}_{}_{}_{}",
            id.account, id.channel_id, id.domain, id.buying_method, id.category
        );
        prop_assert_eq!(rebuilt, name);
    }

    #[test]
    fn arbitrary_input_never_panics(name in "\\PC{0,40}") {
        let id = ParsedIdentity::parse(&name);
        prop_assert!(id.account.len() <= 1);
        prop_assert!(!id.domain.is_empty());
        prop_assert!(!id.locale.is_empty());
    }
}
