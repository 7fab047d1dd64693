//! Integration tests for the storefront router table
//!
//! These tests verify the resolution contract both environments rely on:
//! 1. Structural matches resolve to the route's page with ordered parameters
//! 2. Registration order decides between ambiguous patterns
//! 3. Misses resolve to the not-found page and still parse the query
//! 4. Resolution is deterministic for the same URL

use proptest::prelude::*;
use rstest::rstest;
use storefront_urls::{PageId, QueryParams, RouterTable};

fn table() -> RouterTable {
	RouterTable::storefront().unwrap()
}

#[rstest]
#[case("/", PageId::Home)]
#[case("/?page=2&sort=price_desc", PageId::Home)]
#[case("/product/42/", PageId::ProductDetail)]
#[case("/product/42", PageId::NotFound)]
#[case("/404", PageId::NotFound)]
#[case("/unknown", PageId::NotFound)]
#[case("/product/", PageId::NotFound)]
fn test_storefront_resolution(#[case] url: &str, #[case] expected: PageId) {
	assert_eq!(table().resolve(url).page_id, expected);
}

#[rstest]
fn test_detail_example() {
	let m = table().resolve("/product/42/?ref=home");

	assert_eq!(m.page_id, PageId::ProductDetail);
	assert_eq!(m.params.len(), 1);
	assert_eq!(m.param("id"), Some("42"));
	assert_eq!(m.query, QueryParams::new().with("ref", "home"));
}

#[rstest]
fn test_unknown_example() {
	let m = table().resolve("/unknown");

	assert_eq!(m.page_id, PageId::NotFound);
	assert!(m.params.is_empty());
	assert!(m.query.is_empty());
}

#[rstest]
fn test_fragment_is_ignored() {
	let m = table().resolve("/product/9/?tab=reviews#specs");
	assert_eq!(m.param("id"), Some("9"));
	assert_eq!(m.query_param("tab"), Some("reviews"));
}

#[rstest]
fn test_ambiguous_pair_respects_registration_order() {
	let catch_all_first = RouterTable::new()
		.route("/:section/", PageId::Home)
		.unwrap()
		.route("/404/", PageId::NotFound)
		.unwrap();
	let literal_first = RouterTable::new()
		.route("/404/", PageId::NotFound)
		.unwrap()
		.route("/:section/", PageId::Home)
		.unwrap();

	assert_eq!(catch_all_first.resolve("/404/").page_id, PageId::Home);
	assert_eq!(literal_first.resolve("/404/").page_id, PageId::NotFound);
}

#[rstest]
fn test_multiple_params_are_zipped_by_position() {
	let table = RouterTable::new()
		.route("/c/:category1/:category2/", PageId::Home)
		.unwrap();
	let m = table.resolve("/c/food/fruit/");
	assert_eq!(m.param("category1"), Some("food"));
	assert_eq!(m.param("category2"), Some("fruit"));
}

#[rstest]
fn test_resolution_is_fresh_per_call() {
	let table = table();
	let first = table.resolve("/product/1/?a=1");
	let second = table.resolve("/product/1/?a=1");
	assert_eq!(first, second);
	assert_eq!(table.resolve("/").page_id, PageId::Home);
	assert_eq!(first.param("id"), Some("1"));
}

proptest! {
	#[test]
	fn prop_detail_segment_is_captured(id in "[A-Za-z0-9_.~-]{1,24}") {
		let url = format!("/product/{}/", id);
		let m = table().resolve(&url);
		prop_assert_eq!(m.page_id, PageId::ProductDetail);
		prop_assert_eq!(m.param("id"), Some(id.as_str()));
	}

	#[test]
	fn prop_extra_segments_never_match_detail(a in "[a-z0-9]{1,8}", b in "[a-z0-9]{1,8}") {
		let url = format!("/product/{}/{}/", a, b);
		prop_assert_eq!(table().resolve(&url).page_id, PageId::NotFound);
	}

	#[test]
	fn prop_resolution_is_deterministic(path in "/[a-z0-9/]{0,20}", key in "[a-z]{1,5}", value in "[a-z0-9]{0,5}") {
		let url = format!("{}?{}={}", path, key, value);
		let table = table();
		prop_assert_eq!(table.resolve(&url), table.resolve(&url));
		let resolved = table.resolve(&url);
		prop_assert_eq!(resolved.query_param(&key), Some(value.as_str()));
	}

	#[test]
	fn prop_url_for_round_trips(id in "[A-Za-z0-9]{1,16}") {
		let table = table().with_base_path("/shop");
		let url = table.url_for(PageId::ProductDetail, &[("id", &id)], &QueryParams::new()).unwrap();
		let resolved = table.resolve(&url);
		prop_assert_eq!(resolved.param("id"), Some(id.as_str()));
	}
}
