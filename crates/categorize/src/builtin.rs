/// Canonical photography subjects and the keywords that point at them.
///
/// Bump [`BUILTIN_TABLE_VERSION`] whenever names or keywords change; scores
/// depend on this table.
#[derive(Debug, Clone, Copy)]
pub struct BuiltinCategory {
    pub name: &'static str,
    pub keywords: &'static [&'static str],
}

pub const BUILTIN_TABLE_VERSION: u32 = 1;

pub const BUILTIN_CATEGORIES: &[BuiltinCategory] = &[
    BuiltinCategory {
        name: "Nature",
        keywords: &[
            "nature",
            "tree",
            "forest",
            "mountain",
            "lake",
            "river",
            "flower",
            "plant",
            "outdoor",
            "wilderness",
            "waterfall",
            "sky",
        ],
    },
    BuiltinCategory {
        name: "Portrait",
        keywords: &[
            "portrait", "face", "person", "people", "smile", "headshot", "selfie", "model",
        ],
    },
    BuiltinCategory {
        name: "Wedding",
        keywords: &[
            "wedding", "bride", "groom", "bridal", "ceremony", "veil", "bouquet",
        ],
    },
    BuiltinCategory {
        name: "Events",
        keywords: &[
            "event",
            "party",
            "celebration",
            "concert",
            "festival",
            "crowd",
            "stage",
            "conference",
        ],
    },
    BuiltinCategory {
        name: "Architecture",
        keywords: &[
            "architecture",
            "building",
            "house",
            "skyscraper",
            "bridge",
            "tower",
            "facade",
            "interior",
            "church",
        ],
    },
    BuiltinCategory {
        name: "Food",
        keywords: &[
            "food",
            "dish",
            "meal",
            "cuisine",
            "restaurant",
            "dessert",
            "fruit",
            "vegetable",
            "drink",
        ],
    },
    BuiltinCategory {
        name: "Travel",
        keywords: &[
            "travel", "vacation", "tourism", "landmark", "monument", "city", "beach", "resort",
        ],
    },
    BuiltinCategory {
        name: "Sports",
        keywords: &[
            "sport",
            "athlete",
            "football",
            "soccer",
            "basketball",
            "tennis",
            "running",
            "stadium",
        ],
    },
    BuiltinCategory {
        name: "Animals",
        keywords: &[
            "animal", "dog", "cat", "bird", "wildlife", "pet", "horse", "mammal",
        ],
    },
    BuiltinCategory {
        name: "Street",
        keywords: &[
            "street", "urban", "road", "traffic", "alley", "graffiti", "sidewalk",
        ],
    },
    BuiltinCategory {
        name: "Product",
        keywords: &[
            "product",
            "bottle",
            "packaging",
            "watch",
            "shoe",
            "jewelry",
            "cosmetics",
        ],
    },
];
