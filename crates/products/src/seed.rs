//! Sample products loaded by `initLedger`.

use chrono::{DateTime, Utc};

use winechain_core::{Aggregate, DomainError, DomainResult, ProductKey};

use crate::model::{Grape, Wine, Winery};
use crate::product::{CreateProduct, Product, ProductCommand};

/// Creation commands for the sample products, keyed 1 and 2.
pub fn sample_commands(at: DateTime<Utc>) -> Vec<CreateProduct> {
    vec![
        CreateProduct {
            key: ProductKey::new(1),
            company_name: "Hoggies Estate".to_string(),
            grape: Grape {
                name: "Gaven".to_string(),
                region: "Merbein".to_string(),
                vineyard: "Thompson".to_string(),
                block: "2".to_string(),
                row_range: "1-3".to_string(),
                variety: "Muscat of Alexandria".to_string(),
                vintage: 2018,
                date_delivered: "2018-04-12".to_string(),
                estimated_weight: 20.0,
                actual_weight: 18.0,
            },
            winery: Winery {
                volume: 5000.0,
                ..Winery::named("Trentham Estate")
            },
            wine: Wine {
                name: "Best Bottlers".to_string(),
                label: "Hoggies".to_string(),
                cork_cap: String::new(),
                status: "Labeled".to_string(),
                seller: "Liquid Shop".to_string(),
                brand: "Vintage Reserve Shiraz".to_string(),
            },
            occurred_at: at,
        },
        CreateProduct {
            key: ProductKey::new(2),
            company_name: "Penley".to_string(),
            grape: Grape {
                region: "Coonawarra".to_string(),
                vineyard: "Ladbroke".to_string(),
                block: "3".to_string(),
                row_range: "4-10".to_string(),
                variety: "Shiraz".to_string(),
                vintage: 2016,
                date_delivered: "2017-12-23".to_string(),
                estimated_weight: 35.0,
                actual_weight: 33.0,
                ..Grape::default()
            },
            winery: Winery {
                name: "Limestone Coast Wines".to_string(),
                volume: 5600.0,
                actual_weight: 33.0,
                received_from: String::new(),
                transferred_to: String::new(),
                bottling_company: "Liquid Goods".to_string(),
            },
            wine: Wine {
                name: String::new(),
                label: "Olivias".to_string(),
                cork_cap: String::new(),
                status: "Not Labeled".to_string(),
                seller: "BWS".to_string(),
                brand: "Riesling".to_string(),
            },
            occurred_at: at,
        },
    ]
}

/// Sample products at stage 10, all started at `at`.
pub fn sample_products(at: DateTime<Utc>) -> DomainResult<Vec<Product>> {
    sample_commands(at)
        .into_iter()
        .map(|cmd| {
            let mut product = Product::empty(cmd.key);
            let events = product.handle(&ProductCommand::CreateProduct(cmd))?;
            for event in &events {
                product.apply(event);
            }
            if !product.is_created() {
                return Err(DomainError::invalid_state("seed produced no history"));
            }
            Ok(product)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn seeds_two_products_at_stage_ten() {
        let at = Utc.with_ymd_and_hms(2018, 4, 12, 8, 0, 0).unwrap();
        let products = sample_products(at).unwrap();

        assert_eq!(products.len(), 2);
        assert_eq!(products[0].key(), ProductKey::new(1));
        assert_eq!(products[0].company_name(), "Hoggies Estate");
        assert_eq!(products[0].grape().region, "Merbein");
        assert_eq!(products[1].key(), ProductKey::new(2));
        assert_eq!(products[1].grape().region, "Coonawarra");

        for product in &products {
            assert_eq!(product.current_stage_id(), Some(10));
            assert_eq!(product.transactions()[0].start, at);
            assert!(product.distributions().is_empty());
        }
    }
}
