//! End-to-end tests for the resolution/merge engine: precedence, search,
//! point lookup, per-owner privacy, and country routing.

mod common;

use assert_matches::assert_matches;
use reforma_catalog::CatalogError;
use reforma_db::models::effective_price::PriceSource;
use reforma_db::models::price_override::PriceUpdate;
use reforma_db::routing::BASE_TABLES;
use sqlx::PgPool;

use common::{category_id, create_user, seed_global_price, service, TOLERANCE};

#[sqlx::test(migrations = "../../db/migrations")]
async fn unauthenticated_callers_fail_closed(pool: PgPool) {
    let svc = service(&pool, None, None);

    assert_matches!(svc.list_all().await, Err(CatalogError::Unauthenticated));
    assert_matches!(svc.search("x").await, Err(CatalogError::Unauthenticated));
    assert_matches!(
        svc.increase_all_prices(10.0).await,
        Err(CatalogError::Unauthenticated)
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn override_wins_over_global_for_same_code(pool: PgPool) {
    let user = create_user(&pool, "merge@example.com").await;
    let demolition = category_id(&pool, "Demolition").await;
    let gid = seed_global_price(
        &pool,
        BASE_TABLES.global,
        "01-D-01",
        Some(demolition),
        [6.0, 5.4, 2.0, 1.0],
        20.0,
    )
    .await;
    seed_global_price(
        &pool,
        BASE_TABLES.global,
        "01-D-02",
        Some(demolition),
        [3.0, 2.0, 0.0, 0.0],
        20.0,
    )
    .await;

    let svc = service(&pool, Some(user), None);
    svc.update_price(
        gid,
        &PriceUpdate {
            margin_percentage: Some(50.0),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    let merged = svc.list_by_category(demolition).await.unwrap();
    assert_eq!(merged.len(), 2, "merge is unique by code");

    let edited = &merged[0];
    assert_eq!(edited.code, "01-D-01");
    assert_eq!(edited.source, PriceSource::Override);
    assert_eq!(edited.origin_code.as_deref(), Some("01-D-01"));
    assert!((edited.final_price - 21.6).abs() < TOLERANCE);

    let pristine = &merged[1];
    assert_eq!(pristine.code, "01-D-02");
    assert_eq!(pristine.source, PriceSource::Global);
    assert!(!pristine.is_custom);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn overrides_are_private_to_their_owner(pool: PgPool) {
    let alice = create_user(&pool, "alice@example.com").await;
    let bob = create_user(&pool, "bob@example.com").await;
    let gid = seed_global_price(
        &pool,
        BASE_TABLES.global,
        "02-M-01",
        None,
        [10.0, 0.0, 0.0, 0.0],
        10.0,
    )
    .await;

    let alice_svc = service(&pool, Some(alice), None);
    alice_svc
        .update_price(
            gid,
            &PriceUpdate {
                margin_percentage: Some(100.0),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let bob_view = service(&pool, Some(bob), None).list_all().await.unwrap();
    assert_eq!(bob_view.len(), 1);
    assert_eq!(bob_view[0].source, PriceSource::Global);
    assert!((bob_view[0].final_price - 11.0).abs() < TOLERANCE);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn search_matches_at_the_storage_layer(pool: PgPool) {
    let user = create_user(&pool, "search@example.com").await;
    seed_global_price(&pool, BASE_TABLES.global, "07-T-01", None, [5.0, 0.0, 0.0, 0.0], 0.0).await;
    sqlx::query(
        "UPDATE global_prices SET description = 'Drywall partition 10cm', subcategory = 'Partitions' \
         WHERE code = '07-T-01'",
    )
    .execute(&pool)
    .await
    .unwrap();
    seed_global_price(&pool, BASE_TABLES.global, "07-T-02", None, [2.0, 0.0, 0.0, 0.0], 0.0).await;

    let svc = service(&pool, Some(user), None);

    // Case-insensitive description match.
    let hits = svc.search("DRYWALL").await.unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].code, "07-T-01");

    // Subcategory and code substrings match too.
    assert_eq!(svc.search("partitions").await.unwrap().len(), 1);
    assert_eq!(svc.search("07-T").await.unwrap().len(), 2);

    // Blank input short-circuits to an empty result.
    assert!(svc.search("   ").await.unwrap().is_empty());

    // An override found by search shadows its global entry.
    let gid: (i64,) = sqlx::query_as("SELECT id FROM global_prices WHERE code = '07-T-01'")
        .fetch_one(&pool)
        .await
        .unwrap();
    svc.update_price(
        gid.0,
        &PriceUpdate {
            margin_percentage: Some(40.0),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    let hits = svc.search("drywall").await.unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].source, PriceSource::Override);
    assert!((hits[0].final_price - 7.0).abs() < TOLERANCE);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn resolve_by_code_prefers_the_override(pool: PgPool) {
    let user = create_user(&pool, "resolve@example.com").await;
    let gid = seed_global_price(
        &pool,
        BASE_TABLES.global,
        "03-E-05",
        None,
        [4.0, 4.0, 0.0, 0.0],
        25.0,
    )
    .await;

    let svc = service(&pool, Some(user), None);

    let pristine = svc.resolve_by_code("03-E-05").await.unwrap().unwrap();
    assert_eq!(pristine.source, PriceSource::Global);
    assert!((pristine.final_price - 10.0).abs() < TOLERANCE);

    svc.update_price(
        gid,
        &PriceUpdate {
            margin_percentage: Some(50.0),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    let resolved = svc.resolve_by_code("03-E-05").await.unwrap().unwrap();
    assert_eq!(resolved.source, PriceSource::Override);
    assert!((resolved.final_price - 12.0).abs() < TOLERANCE);

    assert!(svc.resolve_by_code("99-Z-99").await.unwrap().is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn country_catalogs_are_isolated(pool: PgPool) {
    let user = create_user(&pool, "roam@example.com").await;
    seed_global_price(&pool, BASE_TABLES.global, "01-D-01", None, [5.0, 0.0, 0.0, 0.0], 0.0).await;
    seed_global_price(
        &pool,
        "global_prices_mx",
        "01-D-01",
        None,
        [8.0, 0.0, 0.0, 0.0],
        0.0,
    )
    .await;

    let base_svc = service(&pool, Some(user), Some("ES"));
    let mx_svc = service(&pool, Some(user), Some("MX"));

    let base_view = base_svc.list_all().await.unwrap();
    let mx_view = mx_svc.list_all().await.unwrap();
    assert!((base_view[0].final_price - 5.0).abs() < TOLERANCE);
    assert!((mx_view[0].final_price - 8.0).abs() < TOLERANCE);

    // An edit in one country's catalog never leaks into another.
    let mx_gid: (i64,) = sqlx::query_as("SELECT id FROM global_prices_mx WHERE code = '01-D-01'")
        .fetch_one(&pool)
        .await
        .unwrap();
    mx_svc
        .update_price(
            mx_gid.0,
            &PriceUpdate {
                margin_percentage: Some(10.0),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let base_after = base_svc.list_all().await.unwrap();
    assert_eq!(base_after[0].source, PriceSource::Global);

    // Unknown countries fall back to the base catalog.
    let fallback_view = service(&pool, Some(user), Some("FR")).list_all().await.unwrap();
    assert!((fallback_view[0].final_price - 5.0).abs() < TOLERANCE);
}
