use crate::catalog::UnitCatalog;
use rand::seq::index;
use rand::Rng;
use serde::{Deserialize, Serialize};
use unit_core::UnitTemplate;

/// Number of templates offered per shop phase
pub const DEFAULT_OFFER_SIZE: usize = 5;

/// Templates offered to a player for one shop phase.
///
/// Every entry is an independent copy; nothing here refers back into the
/// catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShopOffer {
    choices: Vec<UnitTemplate>,
}

impl ShopOffer {
    pub fn new(choices: Vec<UnitTemplate>) -> Self {
        ShopOffer { choices }
    }

    /// Get the template in a slot
    pub fn get(&self, index: usize) -> Option<&UnitTemplate> {
        self.choices.get(index)
    }

    pub fn choices(&self) -> &[UnitTemplate] {
        &self.choices
    }

    pub fn len(&self) -> usize {
        self.choices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.choices.is_empty()
    }
}

/// Randomized storefront over a unit catalog
#[derive(Debug, Clone)]
pub struct Shop {
    catalog: UnitCatalog,
}

impl Shop {
    pub fn new(catalog: UnitCatalog) -> Self {
        Shop { catalog }
    }

    pub fn catalog(&self) -> &UnitCatalog {
        &self.catalog
    }

    /// Draw up to `pool_size` distinct templates uniformly without replacement
    pub fn offer_choices<R: Rng + ?Sized>(&self, pool_size: usize, rng: &mut R) -> ShopOffer {
        let templates = self.catalog.templates();
        let amount = pool_size.min(templates.len());

        let choices: Vec<UnitTemplate> = index::sample(rng, templates.len(), amount)
            .into_iter()
            .map(|i| templates[i].clone())
            .collect();

        tracing::debug!(
            offered = ?choices.iter().map(|t| t.name.as_str()).collect::<Vec<_>>(),
            "shop offer"
        );
        ShopOffer::new(choices)
    }
}
