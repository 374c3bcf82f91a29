//! Behaviour of the filtered, paginated catalog read path against a real
//! SQLite store.

mod support;

use std::sync::Arc;

use forecourt_core::catalog::CatalogReadService;
use forecourt_core::database::{
    GalleryStore, ListingStore, SqliteGalleryStore, SqliteListingStore,
};
use forecourt_core::query::PAGE_SIZE;
use forecourt_model::{ListingFields, PriceBand, SearchFilters, YearBand};

fn read_service(pool: &sqlx::SqlitePool) -> CatalogReadService {
    CatalogReadService::new(
        Arc::new(SqliteListingStore::new(pool.clone())),
        Arc::new(SqliteGalleryStore::new(pool.clone())),
    )
}

async fn seed(store: &SqliteListingStore, vin: &str, fields: ListingFields) -> i64 {
    store
        .insert(&ListingFields {
            vin: vin.into(),
            carfax_url: format!("https://carfax.example/{vin}"),
            ..fields
        })
        .await
        .expect("seed listing")
}

#[tokio::test]
async fn empty_filters_return_the_full_catalog_newest_first() {
    let pool = support::memory_pool().await;
    let store = SqliteListingStore::new(pool.clone());
    for n in 0..3 {
        seed(&store, &format!("VIN{n:05}"), support::fields("x")).await;
    }

    let results = read_service(&pool)
        .search(&SearchFilters::default(), 1)
        .await
        .expect("search");

    assert_eq!(results.total_count, 3);
    assert_eq!(results.total_pages, 1);
    assert_eq!(results.current_page, 1);
    let ids: Vec<i64> = results.items.iter().map(|item| item.listing.id).collect();
    assert_eq!(ids, vec![3, 2, 1]);
}

#[tokio::test]
async fn worked_example_twelve_matches_page_two_returns_the_last_three() {
    let pool = support::memory_pool().await;
    let store = SqliteListingStore::new(pool.clone());

    // Twelve rows matching price 5000-9999 and year >= 2015 (ids 1..=12)...
    for n in 0..12 {
        let mut fields = support::fields("x");
        fields.price = 6500;
        fields.year = 2017;
        seed(&store, &format!("MATCH{n:04}"), fields).await;
    }
    // ...plus noise on either side of each band.
    for (n, (price, year)) in
        [(3000, 2017), (6500, 2010), (20000, 2020)].into_iter().enumerate()
    {
        let mut fields = support::fields("x");
        fields.price = price;
        fields.year = year;
        seed(&store, &format!("NOISE{n:04}"), fields).await;
    }

    let filters = SearchFilters {
        price: Some(PriceBand::Mid5000To9999),
        year: Some(YearBand::From2015),
        ..SearchFilters::default()
    };
    let results = read_service(&pool).search(&filters, 2).await.expect("search");

    assert_eq!(results.total_count, 12);
    assert_eq!(results.total_pages, 2);
    assert_eq!(results.current_page, 2);
    // Page 1 held the 9 newest matches; page 2 holds the remaining 3.
    let ids: Vec<i64> = results.items.iter().map(|item| item.listing.id).collect();
    assert_eq!(ids, vec![3, 2, 1]);
}

#[tokio::test]
async fn exact_multiple_of_page_size_does_not_add_an_empty_page() {
    let pool = support::memory_pool().await;
    let store = SqliteListingStore::new(pool.clone());
    for n in 0..PAGE_SIZE {
        seed(&store, &format!("FULL{n:04}"), support::fields("x")).await;
    }

    let service = read_service(&pool);
    let results = service
        .search(&SearchFilters::default(), 1)
        .await
        .expect("search");
    assert_eq!(results.total_count, i64::from(PAGE_SIZE));
    assert_eq!(results.total_pages, 1);
    assert_eq!(results.items.len(), PAGE_SIZE as usize);

    let results = service
        .search(&SearchFilters::default(), 2)
        .await
        .expect("search");
    assert!(results.items.is_empty());
}

#[tokio::test]
async fn page_never_exceeds_what_the_count_promises() {
    let pool = support::memory_pool().await;
    let store = SqliteListingStore::new(pool.clone());
    for n in 0..23 {
        let mut fields = support::fields("x");
        fields.price = if n % 2 == 0 { 4000 } else { 8000 };
        fields.year = if n % 3 == 0 { 2003 } else { 2019 };
        fields.sold = n % 4 == 0;
        seed(&store, &format!("AGREE{n:04}"), fields).await;
    }

    let service = read_service(&pool);
    let combos = [
        SearchFilters::default(),
        SearchFilters {
            price: Some(PriceBand::UpTo4999),
            ..SearchFilters::default()
        },
        SearchFilters {
            year: Some(YearBand::From2015),
            sold: Some(false),
            ..SearchFilters::default()
        },
        SearchFilters {
            text: Some("civic".into()),
            price: Some(PriceBand::Mid5000To9999),
            ..SearchFilters::default()
        },
    ];

    for filters in &combos {
        for page in 1..=4u32 {
            let results = service.search(filters, page).await.expect("search");
            let offset = i64::from((page - 1) * PAGE_SIZE);
            let remaining = (results.total_count - offset).max(0);
            let expected = remaining.min(i64::from(PAGE_SIZE)) as usize;
            assert_eq!(
                results.items.len(),
                expected,
                "filters {filters:?} page {page}"
            );
        }
    }
}

#[tokio::test]
async fn text_filter_matches_title_make_and_model() {
    let pool = support::memory_pool().await;
    let store = SqliteListingStore::new(pool.clone());

    let mut civic = support::fields("x");
    civic.make = "Honda".into();
    civic.model = "Civic".into();
    civic.title = "2018 Honda Civic".into();
    seed(&store, "TXT00001", civic).await;

    let mut outback = support::fields("x");
    outback.make = "Subaru".into();
    outback.model = "Outback".into();
    outback.title = "2016 Subaru Outback".into();
    seed(&store, "TXT00002", outback).await;

    let service = read_service(&pool);

    // Case-insensitive substring against make.
    let results = service
        .search(&SearchFilters::from_raw(Some("hONda"), None, None, None), 1)
        .await
        .expect("search");
    assert_eq!(results.total_count, 1);
    assert_eq!(results.items[0].listing.model, "Civic");

    // And against model.
    let results = service
        .search(&SearchFilters::from_raw(Some("outba"), None, None, None), 1)
        .await
        .expect("search");
    assert_eq!(results.total_count, 1);
    assert_eq!(results.items[0].listing.make, "Subaru");
}

#[tokio::test]
async fn sold_filter_and_unrecognized_bands() {
    let pool = support::memory_pool().await;
    let store = SqliteListingStore::new(pool.clone());

    let mut sold = support::fields("x");
    sold.sold = true;
    seed(&store, "SOLD0001", sold).await;
    seed(&store, "AVAIL001", support::fields("x")).await;

    let service = read_service(&pool);

    let results = service
        .search(&SearchFilters::from_raw(None, None, None, Some("1")), 1)
        .await
        .expect("search");
    assert_eq!(results.total_count, 1);
    assert!(results.items[0].listing.sold);

    // Malformed band values fall back to the unfiltered catalog.
    let results = service
        .search(
            &SearchFilters::from_raw(None, Some("cheap"), Some("vintage"), None),
            1,
        )
        .await
        .expect("search");
    assert_eq!(results.total_count, 2);
}

#[tokio::test]
async fn search_resolves_each_listing_effective_primary() {
    let pool = support::memory_pool().await;
    let store = SqliteListingStore::new(pool.clone());
    let gallery = SqliteGalleryStore::new(pool.clone());

    let with_image = seed(&store, "IMG00001", support::fields("x")).await;
    let bare = seed(&store, "IMG00002", support::fields("x")).await;
    gallery
        .register(with_image, &support::new_image("front"))
        .await
        .expect("register");

    let results = read_service(&pool)
        .search(&SearchFilters::default(), 1)
        .await
        .expect("search");

    let by_id = |id: i64| {
        results
            .items
            .iter()
            .find(|item| item.listing.id == id)
            .expect("listing in page")
    };
    assert_eq!(
        by_id(with_image).primary_image_url.as_deref(),
        Some("https://cdn.test/front.jpg")
    );
    assert_eq!(by_id(bare).primary_image_url, None);
}
