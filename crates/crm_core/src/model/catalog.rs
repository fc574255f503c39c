//! Studio service catalog used to prefill order items.

/// A standard service with its list price in minor currency units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogService {
    pub name: &'static str,
    pub default_price: u64,
}

/// Pseudo-entry meaning "free-form line, no catalog defaults".
pub const CUSTOM_SERVICE: &str = "custom";

pub const STUDIO_SERVICES: &[CatalogService] = &[
    CatalogService {
        name: "Website development",
        default_price: 100_000,
    },
    CatalogService {
        name: "UI/UX design",
        default_price: 50_000,
    },
    CatalogService {
        name: "Mobile app development",
        default_price: 200_000,
    },
    CatalogService {
        name: "SEO optimization",
        default_price: 30_000,
    },
    CatalogService {
        name: "Technical support",
        default_price: 20_000,
    },
    CatalogService {
        name: "Website redesign",
        default_price: 70_000,
    },
    CatalogService {
        name: "CRM setup",
        default_price: 40_000,
    },
    CatalogService {
        name: "Logo design",
        default_price: 25_000,
    },
    CatalogService {
        name: "SMM promotion",
        default_price: 35_000,
    },
    CatalogService {
        name: "Contextual advertising",
        default_price: 30_000,
    },
];

/// Looks up a catalog entry by exact name.
pub fn find_service(name: &str) -> Option<&'static CatalogService> {
    STUDIO_SERVICES.iter().find(|service| service.name == name)
}
