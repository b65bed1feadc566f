//! Registered sources and their storefronts.

use super::{FixedMenu, HeadingCalendar, ImageBlockHeuristic, SeasonalStand, Source, StoreCalendars};

/// Static description of one storefront.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreInfo {
    /// Sub-location slug; empty for single-store sources.
    pub slug: &'static str,
    pub brand: &'static str,
    pub display_name: &'static str,
    pub address: &'static str,
    pub phone: &'static str,
    pub hours: &'static str,
    pub website: &'static str,
}

impl StoreInfo {
    /// `source` alone for single-store sources, `source-slug` otherwise.
    pub fn location_id(&self, source: &str) -> String {
        if self.slug.is_empty() {
            source.to_owned()
        } else {
            format!("{source}-{}", self.slug)
        }
    }
}

const KOPPS_URL: &str = "https://www.kopps.com/flavor-forecast";

const KOPPS_STORES: [StoreInfo; 3] = [
    StoreInfo {
        slug: "brookfield",
        brand: "Kopp's Frozen Custard",
        display_name: "Brookfield",
        address: "18880 W Bluemound Rd, Brookfield, WI 53045",
        phone: "(262) 789-1393",
        hours: "10:30 AM - 11:00 PM",
        website: "https://www.kopps.com",
    },
    StoreInfo {
        slug: "glendale",
        brand: "Kopp's Frozen Custard",
        display_name: "Glendale",
        address: "5373 N Port Washington Rd, Glendale, WI 53217",
        phone: "(414) 961-3288",
        hours: "10:30 AM - 11:00 PM",
        website: "https://www.kopps.com",
    },
    StoreInfo {
        slug: "greenfield",
        brand: "Kopp's Frozen Custard",
        display_name: "Greenfield",
        address: "7631 W Layton Ave, Greenfield, WI 53220",
        phone: "(414) 282-4312",
        hours: "10:30 AM - 11:00 PM",
        website: "https://www.kopps.com",
    },
];

const GILLES_URL: &str = "https://gillesfrozencustard.com/flavor-of-the-day";

const GILLES_STORE: StoreInfo = StoreInfo {
    slug: "",
    brand: "Gilles Frozen Custard",
    display_name: "Wauwatosa",
    address: "7515 W Bluemound Rd, Milwaukee, WI 53213",
    phone: "(414) 453-4875",
    hours: "11:00 AM - 11:00 PM",
    website: "https://gillesfrozencustard.com",
};

const CULVERS_URL_BASE: &str = "https://www.culvers.com/restaurants";

const CULVERS_STORES: [StoreInfo; 3] = [
    StoreInfo {
        slug: "glendale-wi-n-port-washington-rd",
        brand: "Culver's",
        display_name: "Glendale - N Port Washington Rd",
        address: "6200 N Port Washington Rd, Glendale, WI 53217",
        phone: "(414) 962-5100",
        hours: "10:00 AM - 10:00 PM",
        website: "https://www.culvers.com",
    },
    StoreInfo {
        slug: "milwaukee-wi-s-76th-st",
        brand: "Culver's",
        display_name: "Milwaukee - S 76th St",
        address: "4201 S 76th St, Milwaukee, WI 53220",
        phone: "(414) 543-3660",
        hours: "10:00 AM - 10:00 PM",
        website: "https://www.culvers.com",
    },
    StoreInfo {
        slug: "west-allis-wi-w-greenfield-ave",
        brand: "Culver's",
        display_name: "West Allis - W Greenfield Ave",
        address: "10201 W Greenfield Ave, West Allis, WI 53214",
        phone: "(414) 771-8000",
        hours: "10:00 AM - 10:00 PM",
        website: "https://www.culvers.com",
    },
];

const LEONS_STORE: StoreInfo = StoreInfo {
    slug: "",
    brand: "Leon's Frozen Custard",
    display_name: "Milwaukee",
    address: "3131 S 27th St, Milwaukee, WI 53215",
    phone: "(414) 383-1784",
    hours: "11:00 AM - 12:00 AM",
    website: "https://www.leonsfrozencustard.us",
};

const LEONS_MENU: [(&str, &str); 4] = [
    ("Vanilla", "Classic vanilla frozen custard"),
    ("Chocolate", "Rich chocolate frozen custard"),
    ("Butter Pecan", "Vanilla custard loaded with buttered pecans"),
    ("Strawberry", "Vanilla custard swirled with strawberries"),
];

const MURFS_URL: &str = "https://www.murfsfrozencustard.com";

const MURFS_STORE: StoreInfo = StoreInfo {
    slug: "",
    brand: "Murf's Frozen Custard",
    display_name: "Menomonee Falls",
    address: "N88 W16447 Main St, Menomonee Falls, WI 53051",
    phone: "(262) 251-4300",
    hours: "11:00 AM - 9:00 PM (seasonal)",
    website: "https://www.murfsfrozencustard.com",
};

const MURFS_REOPENING: &str = "Closed for the winter season. Reopening March 1.";

/// Every source, in the order their locations appear in a snapshot.
pub fn default_sources() -> Vec<Box<dyn Source>> {
    vec![
        Box::new(HeadingCalendar::new("kopps", KOPPS_URL, KOPPS_STORES.to_vec())),
        Box::new(ImageBlockHeuristic::new("gilles", GILLES_URL, GILLES_STORE)),
        Box::new(StoreCalendars::new(
            "culvers",
            CULVERS_URL_BASE,
            CULVERS_STORES.to_vec(),
        )),
        Box::new(FixedMenu::new("leons", LEONS_STORE, LEONS_MENU.to_vec())),
        Box::new(SeasonalStand::new(
            "murfs",
            MURFS_URL,
            MURFS_STORE,
            MURFS_REOPENING,
        )),
    ]
}
