//! Unit tests for pool value types and their wire format.

use anyhow::{Context, Result, ensure};
use rstest::rstest;
use tsumiki::ir::{Pool, PoolDepth, PoolName, Positive};

#[rstest]
#[case::default_pool("", PoolName::Default)]
#[case::console("console", PoolName::Console)]
#[case::custom("link", PoolName::custom("link"))]
fn pool_name_parse_classifies(#[case] text: &str, #[case] expected: PoolName) {
    assert_eq!(PoolName::parse(text), expected);
}

#[rstest]
#[case("")]
#[case("console")]
#[case("link")]
#[case("heavy_link-2.0")]
fn pool_name_round_trips_through_text(#[case] text: &str) {
    let name = PoolName::parse(text);
    assert_eq!(PoolName::parse(&name.to_string()), name);
}

#[rstest]
#[case::default_infinite(PoolName::Default, PoolDepth::Infinite, true)]
#[case::default_finite(PoolName::Default, PoolDepth::Finite(Positive::ONE), false)]
#[case::console_one(PoolName::Console, PoolDepth::Finite(Positive::ONE), true)]
#[case::console_two(PoolName::Console, PoolDepth::Finite(Positive::new(2)), false)]
#[case::console_infinite(PoolName::Console, PoolDepth::Infinite, false)]
#[case::custom_three(PoolName::custom("x"), PoolDepth::Finite(Positive::new(3)), true)]
#[case::custom_infinite(PoolName::custom("x"), PoolDepth::Infinite, false)]
fn pool_constructor_validates_pairings(
    #[case] name: PoolName,
    #[case] depth: PoolDepth,
    #[case] accepted: bool,
) {
    assert_eq!(Pool::new(name, depth).is_ok(), accepted);
}

#[test]
fn finite_depth_serialises_as_an_integer() -> Result<()> {
    let pool = Pool::new(
        PoolName::custom("link"),
        PoolDepth::Finite(Positive::new(4)),
    )?;
    let json = serde_json::to_value(&pool).context("serialise pool")?;
    ensure!(
        json == serde_json::json!({ "name": "link", "depth": 4 }),
        "unexpected pool JSON: {json}"
    );
    Ok(())
}

#[test]
fn infinite_depth_serialises_as_a_string() -> Result<()> {
    let pool = Pool::new(PoolName::Default, PoolDepth::Infinite)?;
    let json = serde_json::to_value(&pool).context("serialise pool")?;
    ensure!(
        json == serde_json::json!({ "name": "", "depth": "infinite" }),
        "unexpected pool JSON: {json}"
    );
    Ok(())
}

#[rstest]
#[case::console(r#"{ "name": "console", "depth": 1 }"#)]
#[case::custom(r#"{ "name": "link", "depth": 4 }"#)]
#[case::default_pool(r#"{ "name": "", "depth": "infinite" }"#)]
fn pool_round_trips_through_json(#[case] json: &str) -> Result<()> {
    let pool: Pool = serde_json::from_str(json).context("deserialise pool")?;
    let text = serde_json::to_string(&pool).context("serialise pool")?;
    let again: Pool = serde_json::from_str(&text).context("deserialise again")?;
    ensure!(again == pool, "round trip changed the pool: {pool:?} vs {again:?}");
    Ok(())
}

#[rstest]
#[case::console_too_deep(r#"{ "name": "console", "depth": 2 }"#)]
#[case::default_bounded(r#"{ "name": "", "depth": 3 }"#)]
#[case::custom_unbounded(r#"{ "name": "link", "depth": "infinite" }"#)]
#[case::zero_depth(r#"{ "name": "link", "depth": 0 }"#)]
#[case::negative_depth(r#"{ "name": "link", "depth": -2 }"#)]
#[case::unknown_text_depth(r#"{ "name": "link", "depth": "bottomless" }"#)]
fn invalid_pool_json_is_rejected(#[case] json: &str) {
    assert!(serde_json::from_str::<Pool>(json).is_err());
}
