// Forbid unwrap() in production code to prevent panics on bad input.
// Test code is allowed to use unwrap() for convenience.
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
use std::time::Duration;

use catalog::config::{DemoConfig, TimingUnit};
use catalog::ordering::SortKey;
use catalog::types::{NewProduct, Product, ProductKind};
use catalog::{Catalog, CatalogError};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "catalog=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration from environment variables
    let config = match DemoConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    tracing::info!(
        "Loaded configuration: sort_keys={:?}, timing_unit={}",
        config.sort_keys,
        config.timing_unit.suffix()
    );

    let mut catalog = Catalog::new();

    reject_invalid_products(&mut catalog);

    for fields in sample_products() {
        if let Err(e) = catalog.register_new(fields) {
            tracing::error!("Failed to register sample product: {e}");
            std::process::exit(1);
        }
    }
    // Post-condition: every sample product is in both stores.
    assert_eq!(catalog.len(), 5, "all sample products must be registered");

    repository_round_trip(&mut catalog);
    index_lookups(&catalog);

    let name_sort = timed_sorts(&catalog, &config);
    if let Some(elapsed) = name_sort {
        tracing::info!(
            "Merge sort by name took {}{}; listing the name index in order is O(n) because it stays ordered on insert",
            config.timing_unit.whole(elapsed),
            config.timing_unit.suffix()
        );
    }
}

/// Try to register products that break each validation rule.
fn reject_invalid_products(catalog: &mut Catalog) {
    let mut blank_name = honey();
    blank_name.id = "X001".to_string();
    blank_name.name = "  ".to_string();

    let mut negative_price = honey();
    negative_price.id = "X002".to_string();
    negative_price.price = -5.0;

    let mut negative_stock = honey();
    negative_stock.id = "X003".to_string();
    negative_stock.stock = -1;

    for fields in [blank_name, negative_price, negative_stock] {
        let id = fields.id.clone();
        match catalog.register_new(fields) {
            Err(CatalogError::Product(e)) => {
                tracing::info!(%id, "rejected invalid product as expected: {e}");
            }
            Err(e) => tracing::warn!(%id, "rejected for an unexpected reason: {e}"),
            Ok(()) => tracing::warn!(%id, "invalid product was accepted"),
        }
    }
}

fn repository_round_trip(catalog: &mut Catalog) {
    let found = catalog.find_by_id("C003").map_or("not found", Product::name);
    tracing::info!("Lookup by ID C003: {found}");

    log_repository(catalog, "All products");

    if catalog.remove("A004").is_some() {
        tracing::info!("Removed product A004");
    }

    log_repository(catalog, "Products after removal");
}

fn log_repository(catalog: &Catalog, heading: &str) {
    let mut products = catalog.products();
    products.sort_by(|a, b| a.id().as_str().cmp(b.id().as_str()));

    tracing::info!("{heading} ({}):", products.len());
    for product in &products {
        tracing::info!("  {product}");
    }
}

fn index_lookups(catalog: &Catalog) {
    let found = catalog
        .find_by_name("Organic Honey")
        .map_or("not found", |product| product.id().as_str());
    tracing::info!("Index lookup by name 'Organic Honey': {found}");

    let index = catalog.name_index();
    tracing::info!(
        entries = index.len(),
        height = index.height(),
        rotations = index.rotation_stats().total(),
        "Products in name order:"
    );
    for product in catalog.products_by_name() {
        tracing::info!("  - {} (ID: {})", product.name(), product.id());
    }
}

/// Sort a snapshot by each configured key. Returns the time taken by the
/// name sort, if one ran.
fn timed_sorts(catalog: &Catalog, config: &DemoConfig) -> Option<Duration> {
    let mut name_sort = None;

    for &key in &config.sort_keys {
        let snapshot = catalog.sorted_snapshot(key);

        tracing::info!("Sorted by {key}:");
        for product in &snapshot.products {
            tracing::info!("  - {}", sort_line(key, product));
        }
        log_elapsed(key, snapshot.elapsed, config.timing_unit);

        if key == SortKey::Name {
            name_sort = Some(snapshot.elapsed);
        }
    }

    name_sort
}

fn sort_line(key: SortKey, product: &Product) -> String {
    match key {
        SortKey::Name => product.name().to_string(),
        SortKey::Price => format!("${:.2} - {}", product.price(), product.name()),
        SortKey::Category => format!("Category: {} - {}", product.category(), product.name()),
    }
}

fn log_elapsed(key: SortKey, elapsed: Duration, unit: TimingUnit) {
    tracing::info!(
        "Sort by {key} took {}{}",
        unit.whole(elapsed),
        unit.suffix()
    );
}

fn honey() -> NewProduct {
    NewProduct {
        id: "A001".to_string(),
        name: "Organic Honey".to_string(),
        price: 25.50,
        category: "Food".to_string(),
        stock: 50,
        producer: "Pure Farm".to_string(),
        kind: ProductKind::Food {
            best_before: "2026-01-01".to_string(),
        },
    }
}

fn sample_products() -> Vec<NewProduct> {
    vec![
        honey(),
        NewProduct {
            id: "B002".to_string(),
            name: "Lavender Natural Soap".to_string(),
            price: 12.00,
            category: "Hygiene".to_string(),
            stock: 120,
            producer: "Earth Workshop".to_string(),
            kind: ProductKind::Craft {
                material: "Essential Oils".to_string(),
            },
        },
        NewProduct {
            id: "C003".to_string(),
            name: "Ground Gourmet Coffee".to_string(),
            price: 45.90,
            category: "Food".to_string(),
            stock: 80,
            producer: "Grandpa's Farm".to_string(),
            kind: ProductKind::Food {
                best_before: "2025-12-31".to_string(),
            },
        },
        NewProduct {
            id: "A004".to_string(),
            name: "Strawberry Jam".to_string(),
            price: 18.75,
            category: "Food".to_string(),
            stock: 60,
            producer: "Pure Farm".to_string(),
            kind: ProductKind::Food {
                best_before: "2026-03-01".to_string(),
            },
        },
        NewProduct {
            id: "B005".to_string(),
            name: "Ceramic Vase".to_string(),
            price: 60.00,
            category: "Decor".to_string(),
            stock: 15,
            producer: "Clay Art".to_string(),
            kind: ProductKind::Craft {
                material: "Clay".to_string(),
            },
        },
    ]
}
