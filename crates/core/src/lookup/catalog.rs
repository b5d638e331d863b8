//! Read-only market, fleet and distance tables.

use std::collections::{BTreeMap, HashMap};

use super::types::{ActiveRoute, Dispatch, DispatchOutcome, Fleet, FleetStatus, Market, Route};

/// Distance used for city pairs missing from the table, km.
pub const DEFAULT_DISTANCE_KM: u32 = 500;

/// Average truck speed, km/h.
pub const AVERAGE_SPEED_KMH: u32 = 80;

/// Market as stored: full base stock plus how full it currently is.
#[derive(Debug, Clone)]
struct MarketSeed {
    market: Market,
    fill_percent: u32,
}

/// Static lookup tables standing in for market and logistics providers.
///
/// Built once at startup and shared immutably; every query is a pure read.
#[derive(Debug, Clone, Default)]
pub struct LookupCatalog {
    markets: HashMap<String, Vec<MarketSeed>>,
    fleets: HashMap<String, Vec<Fleet>>,
    distances: HashMap<(String, String), u32>,
    nearby: HashMap<String, Vec<String>>,
    fallback_nearby: Vec<String>,
    active_routes: Vec<ActiveRoute>,
}

impl LookupCatalog {
    /// A catalog with no data at all.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Register a market. `fill_percent` scales every base stock figure.
    pub fn with_market(
        mut self,
        city: &str,
        market: Market,
        fill_percent: u32,
    ) -> Self {
        self.markets
            .entry(city.to_string())
            .or_default()
            .push(MarketSeed {
                market,
                fill_percent: fill_percent.min(100),
            });
        self
    }

    pub fn with_fleet(mut self, city: &str, fleet: Fleet) -> Self {
        self.fleets.entry(city.to_string()).or_default().push(fleet);
        self
    }

    /// Register an undirected distance between two cities.
    pub fn with_distance(mut self, a: &str, b: &str, km: u32) -> Self {
        self.distances.insert((a.to_string(), b.to_string()), km);
        self
    }

    pub fn with_nearby(mut self, city: &str, nearby: &[&str]) -> Self {
        self.nearby.insert(
            city.to_string(),
            nearby.iter().map(|s| s.to_string()).collect(),
        );
        self
    }

    /// Cities suggested for any city without its own nearby list.
    pub fn with_fallback_nearby(mut self, nearby: &[&str]) -> Self {
        self.fallback_nearby = nearby.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn with_active_route(mut self, route: ActiveRoute) -> Self {
        self.active_routes.push(route);
        self
    }

    // ------------------------------------------------------------------------
    // Markets
    // ------------------------------------------------------------------------

    /// Markets in `city` with current stock levels; empty for unknown cities.
    pub fn available_markets(&self, city: &str) -> Vec<Market> {
        self.markets
            .get(city)
            .map(|seeds| {
                seeds
                    .iter()
                    .map(|seed| {
                        let mut market = seed.market.clone();
                        for stock in market.products.values_mut() {
                            *stock = (*stock as u64 * seed.fill_percent as u64 / 100) as u32;
                        }
                        market
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Total units of `product` across the city's markets.
    ///
    /// Product names compare case-insensitively, like item names in entries.
    pub fn product_availability(&self, city: &str, product: &str) -> u32 {
        let wanted = product.to_lowercase();
        self.available_markets(city)
            .iter()
            .flat_map(|m| m.products.iter())
            .filter(|(name, _)| name.to_lowercase() == wanted)
            .map(|(_, stock)| *stock)
            .sum()
    }

    /// Sum of market capacity in `city`.
    pub fn market_capacity(&self, city: &str) -> u32 {
        self.markets
            .get(city)
            .map(|seeds| seeds.iter().map(|s| s.market.capacity).sum())
            .unwrap_or(0)
    }

    // ------------------------------------------------------------------------
    // Fleets
    // ------------------------------------------------------------------------

    /// All fleets stationed in `city`, in table order.
    pub fn fleets(&self, city: &str) -> &[Fleet] {
        self.fleets.get(city).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn available_fleets(&self, city: &str) -> Vec<&Fleet> {
        self.fleets(city).iter().filter(|f| f.is_available()).collect()
    }

    /// Σ trucks × capacity per truck over the city's fleets.
    pub fn fleet_capacity(&self, city: &str) -> u64 {
        self.fleets(city).iter().map(Fleet::total_capacity).sum()
    }

    // ------------------------------------------------------------------------
    // Routes
    // ------------------------------------------------------------------------

    pub fn distance(&self, from: &str, to: &str) -> u32 {
        let key = (from.to_string(), to.to_string());
        let reverse = (to.to_string(), from.to_string());
        self.distances
            .get(&key)
            .or_else(|| self.distances.get(&reverse))
            .copied()
            .unwrap_or(DEFAULT_DISTANCE_KM)
    }

    pub fn route(&self, from: &str, to: &str) -> Route {
        let distance = self.distance(from, to);
        let total_minutes = distance * 60 / AVERAGE_SPEED_KMH;
        Route {
            distance,
            travel_time: distance as f64 / AVERAGE_SPEED_KMH as f64,
            estimated_arrival: format!("{} h {} min", total_minutes / 60, total_minutes % 60),
        }
    }

    /// Send `amount` of `product` using the first available fleet in `from`.
    ///
    /// Does not check market stock.
    pub fn dispatch(&self, from: &str, to: &str, product: &str, amount: u32) -> DispatchOutcome {
        let Some(fleet) = self.available_fleets(from).into_iter().next() else {
            return DispatchOutcome::NoTruckAvailable {
                message: format!("No available truck in {}", from),
            };
        };

        DispatchOutcome::Dispatched(Dispatch {
            company: fleet.company.clone(),
            from: from.to_string(),
            to: to.to_string(),
            product: product.to_string(),
            amount,
            route: self.route(from, to),
            message: format!(
                "{} is sending {} units of {} from {} to {}",
                fleet.company, amount, product, from, to
            ),
        })
    }

    /// Cities considered close to `city`, falling back to a fixed list.
    pub fn nearby_cities(&self, city: &str) -> Vec<String> {
        self.nearby
            .get(city)
            .cloned()
            .unwrap_or_else(|| self.fallback_nearby.clone())
    }

    pub fn active_routes(&self) -> &[ActiveRoute] {
        &self.active_routes
    }

    // ------------------------------------------------------------------------
    // Built-in data
    // ------------------------------------------------------------------------

    /// The data set the service ships with.
    pub fn builtin() -> Self {
        let mut catalog = Self::empty()
            .with_market(
                "İstanbul",
                market("Mega Market İstanbul", "Beşiktaş", 5, 1000, [5000, 1000, 200, 3000, 500]),
                80,
            )
            .with_market(
                "İstanbul",
                market("Süper Market Anadolu", "Kadıköy", 8, 800, [3000, 500, 100, 2000, 300]),
                40,
            )
            .with_market(
                "Ankara",
                market("Capital Market", "Çankaya", 3, 600, [2000, 300, 80, 1500, 200]),
                60,
            )
            .with_market(
                "İzmir",
                market("Ege Market", "Karşıyaka", 4, 700, [3500, 600, 150, 2500, 400]),
                70,
            );

        for (city, company, trucks, capacity, depot) in BUILTIN_FLEETS {
            catalog = catalog.with_fleet(
                city,
                Fleet {
                    company: company.to_string(),
                    trucks: *trucks,
                    capacity_per_truck: *capacity,
                    status: FleetStatus::Available,
                    location: depot.to_string(),
                },
            );
        }

        for (a, b, km) in BUILTIN_DISTANCES {
            catalog = catalog.with_distance(a, b, *km);
        }

        catalog
            .with_nearby("İstanbul", &["Kocaeli", "Bursa", "Sakarya"])
            .with_nearby("Ankara", &["Konya", "Eskişehir", "Kayseri"])
            .with_nearby("İzmir", &["Denizli", "Manisa", "Aydın"])
            .with_nearby("Trabzon", &["Samsun", "Giresun", "Ordu"])
            .with_nearby("Bursa", &["İstanbul", "Kocaeli", "Eskişehir"])
            .with_nearby("Adana", &["Mersin", "Gaziantep", "Osmaniye"])
            .with_fallback_nearby(&["İstanbul", "Ankara", "İzmir"])
            .with_active_route(ActiveRoute {
                from: "Ankara".to_string(),
                to: "İstanbul".to_string(),
                product: "Battaniye".to_string(),
                amount: 50,
                status: "in_transit".to_string(),
                progress: 65,
            })
            .with_active_route(ActiveRoute {
                from: "İzmir".to_string(),
                to: "Bursa".to_string(),
                product: "Su".to_string(),
                amount: 100,
                status: "preparing".to_string(),
                progress: 10,
            })
    }
}

const PRODUCTS: [&str; 5] = ["Su", "Battaniye", "Çadır", "Konserve", "İlk yardım"];

fn market(name: &str, district: &str, distance: u32, capacity: u32, stock: [u32; 5]) -> Market {
    Market {
        name: name.to_string(),
        location: district.to_string(),
        distance,
        capacity,
        products: PRODUCTS
            .iter()
            .zip(stock)
            .map(|(p, s)| (p.to_string(), s))
            .collect::<BTreeMap<_, _>>(),
    }
}

const BUILTIN_FLEETS: &[(&str, &str, u32, u32, &str)] = &[
    ("İstanbul", "Metro Lojistik", 15, 5000, "Çekmeköy Depo"),
    ("İstanbul", "Anadolu Transport", 20, 7000, "Hadımköy Liman"),
    ("Ankara", "Başkent Nakliyat", 12, 5000, "Ostim Depo"),
    ("Ankara", "Ankara Lojistik", 10, 6000, "Sincan Depo"),
    ("İzmir", "Ege Lojistik", 10, 6000, "Aliağa Liman"),
    ("İzmir", "Aegean Transport", 8, 5500, "Torbalı Depo"),
    ("Bursa", "Uludağ Transport", 8, 5000, "Organize Sanayi"),
    ("Antalya", "Akdeniz Lojistik", 7, 5500, "Alanya Depo"),
    ("Adana", "Çukurova Transport", 9, 6000, "Seyhan Depo"),
    ("Konya", "Anadolu Nakliyat", 6, 5000, "Organize Sanayi"),
    ("Şanlıurfa", "Güneydoğu Lojistik", 5, 4500, "Eyyübiye Depo"),
    ("Gaziantep", "Antep Nakliyat", 8, 5500, "Organize Sanayi"),
    ("Diyarbakır", "Dicle Transport", 7, 5000, "Sur Depo"),
    ("Kocaeli", "Marmara Lojistik", 9, 6000, "Gebze Liman"),
    ("Mersin", "Mersin Liman Taşımacılık", 11, 7000, "Liman Depo"),
    ("Eskişehir", "Porsuk Nakliyat", 5, 5000, "Organize Sanayi"),
    ("Samsun", "Karadeniz Lojistik", 6, 5500, "Liman Depo"),
    ("Denizli", "Pamukkale Transport", 5, 5000, "Organize Sanayi"),
    ("Sakarya", "Sakarya Nakliyat", 7, 5500, "Adapazarı Depo"),
    ("Kayseri", "Erciyes Transport", 6, 5000, "Organize Sanayi"),
    ("Van", "Van Gölü Lojistik", 5, 4500, "İpekyolu Depo"),
    ("Malatya", "Malatya Nakliyat", 5, 5000, "Battalgazi Depo"),
    ("Mardin", "Mardin Transport", 4, 4500, "Kızıltepe Depo"),
];

const BUILTIN_DISTANCES: &[(&str, &str, u32)] = &[
    ("İstanbul", "Ankara", 450),
    ("İstanbul", "İzmir", 550),
    ("İstanbul", "Bursa", 230),
    ("İstanbul", "Antalya", 730),
    ("İstanbul", "Adana", 940),
    ("İstanbul", "Konya", 660),
    ("İstanbul", "Kocaeli", 100),
    ("İstanbul", "Mersin", 1000),
    ("İstanbul", "Eskişehir", 310),
    ("İstanbul", "Samsun", 700),
    ("İstanbul", "Denizli", 670),
    ("İstanbul", "Sakarya", 160),
    ("İstanbul", "Kayseri", 770),
    ("Ankara", "İzmir", 600),
    ("Ankara", "Bursa", 400),
    ("Ankara", "Antalya", 480),
    ("Ankara", "Adana", 500),
    ("Ankara", "Konya", 260),
    ("Ankara", "Şanlıurfa", 850),
    ("Ankara", "Gaziantep", 770),
    ("Ankara", "Diyarbakır", 970),
    ("Ankara", "Mersin", 560),
    ("Ankara", "Eskişehir", 235),
    ("Ankara", "Samsun", 500),
    ("Ankara", "Denizli", 480),
    ("Ankara", "Kayseri", 320),
    ("Ankara", "Van", 1350),
    ("Ankara", "Malatya", 680),
    ("İzmir", "Bursa", 380),
    ("İzmir", "Antalya", 480),
    ("İzmir", "Adana", 900),
    ("İzmir", "Denizli", 240),
    ("Adana", "Gaziantep", 220),
    ("Adana", "Mersin", 70),
    ("Adana", "Diyarbakır", 520),
    ("Gaziantep", "Şanlıurfa", 220),
    ("Gaziantep", "Diyarbakır", 390),
    ("Gaziantep", "Malatya", 350),
    ("Diyarbakır", "Malatya", 240),
    ("Diyarbakır", "Van", 450),
    ("Diyarbakır", "Mardin", 100),
    ("Şanlıurfa", "Malatya", 430),
    ("Şanlıurfa", "Mardin", 190),
    ("Samsun", "Trabzon", 150),
    ("Bursa", "Kocaeli", 175),
    ("Bursa", "Eskişehir", 220),
    ("Bursa", "Sakarya", 280),
    ("Kocaeli", "Sakarya", 60),
    ("Eskişehir", "Konya", 380),
    ("Eskişehir", "Denizli", 450),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_market_stock_is_scaled_by_fill_level() {
        let catalog = LookupCatalog::builtin();
        let markets = catalog.available_markets("İstanbul");
        assert_eq!(markets.len(), 2);
        assert_eq!(markets[0].name, "Mega Market İstanbul");
        assert_eq!(markets[0].products["Su"], 4000);
        assert_eq!(markets[1].products["Su"], 1200);
        assert_eq!(markets[1].products["Çadır"], 40);

        let izmir = catalog.available_markets("İzmir");
        assert_eq!(izmir[0].products["Battaniye"], 420);
    }

    #[test]
    fn test_unknown_city_has_no_markets_or_fleets() {
        let catalog = LookupCatalog::builtin();
        assert!(catalog.available_markets("Hatay").is_empty());
        assert_eq!(catalog.product_availability("Hatay", "Su"), 0);
        assert_eq!(catalog.market_capacity("Hatay"), 0);
        assert!(catalog.fleets("Hatay").is_empty());
        assert_eq!(catalog.fleet_capacity("Hatay"), 0);
    }

    #[test]
    fn test_product_availability_sums_markets() {
        let catalog = LookupCatalog::builtin();
        assert_eq!(catalog.product_availability("İstanbul", "Su"), 5200);
        assert_eq!(catalog.product_availability("İstanbul", "su"), 5200);
        assert_eq!(catalog.product_availability("Ankara", "Battaniye"), 180);
        assert_eq!(catalog.product_availability("Ankara", "ilaç"), 0);
    }

    #[test]
    fn test_capacity_totals() {
        let catalog = LookupCatalog::builtin();
        assert_eq!(catalog.market_capacity("İstanbul"), 1800);
        assert_eq!(catalog.fleet_capacity("İstanbul"), 15 * 5000 + 20 * 7000);
        assert_eq!(catalog.fleet_capacity("Mardin"), 4 * 4500);
    }

    #[test]
    fn test_distance_lookup_is_undirected_with_default() {
        let catalog = LookupCatalog::builtin();
        assert_eq!(catalog.distance("İstanbul", "Ankara"), 450);
        assert_eq!(catalog.distance("Ankara", "İstanbul"), 450);
        assert_eq!(catalog.distance("Hatay", "Van"), DEFAULT_DISTANCE_KM);
    }

    #[test]
    fn test_route_travel_time() {
        let catalog = LookupCatalog::builtin();
        let route = catalog.route("İstanbul", "Ankara");
        assert_eq!(route.distance, 450);
        assert!((route.travel_time - 5.625).abs() < f64::EPSILON);
        assert_eq!(route.estimated_arrival, "5 h 37 min");

        let fallback = catalog.route("Hatay", "Van");
        assert_eq!(fallback.estimated_arrival, "6 h 15 min");
    }

    #[test]
    fn test_dispatch_uses_first_available_fleet() {
        let catalog = LookupCatalog::builtin();
        match catalog.dispatch("İstanbul", "Hatay", "Su", 300) {
            DispatchOutcome::Dispatched(d) => {
                assert_eq!(d.company, "Metro Lojistik");
                assert_eq!(d.amount, 300);
                assert_eq!(d.route.distance, DEFAULT_DISTANCE_KM);
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[test]
    fn test_dispatch_skips_busy_fleets() {
        let busy = Fleet {
            company: "Busy Co".to_string(),
            trucks: 3,
            capacity_per_truck: 1000,
            status: FleetStatus::Busy,
            location: "Depot".to_string(),
        };
        let free = Fleet {
            company: "Free Co".to_string(),
            status: FleetStatus::Available,
            ..busy.clone()
        };

        let catalog = LookupCatalog::empty().with_fleet("Van", busy.clone());
        let outcome = catalog.dispatch("Van", "Hatay", "Su", 10);
        assert_eq!(outcome.status(), "no_truck_available");

        let catalog = catalog.with_fleet("Van", free);
        match catalog.dispatch("Van", "Hatay", "Su", 10) {
            DispatchOutcome::Dispatched(d) => assert_eq!(d.company, "Free Co"),
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[test]
    fn test_dispatch_outcome_serialization() {
        let outcome = DispatchOutcome::InsufficientStock {
            message: "not enough".to_string(),
            available: 5,
            requested: 10,
        };
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["status"], "insufficient_stock");
        assert_eq!(json["available"], 5);

        let dispatched = LookupCatalog::builtin().dispatch("Ankara", "Van", "Su", 1);
        let json = serde_json::to_value(&dispatched).unwrap();
        assert_eq!(json["status"], "dispatched");
        assert_eq!(json["company"], "Başkent Nakliyat");
        assert_eq!(json["route"]["distance"], 1350);
    }

    #[test]
    fn test_nearby_cities_with_fallback() {
        let catalog = LookupCatalog::builtin();
        assert_eq!(
            catalog.nearby_cities("Adana"),
            vec!["Mersin", "Gaziantep", "Osmaniye"]
        );
        assert_eq!(
            catalog.nearby_cities("Hatay"),
            vec!["İstanbul", "Ankara", "İzmir"]
        );
    }

    #[test]
    fn test_active_routes() {
        let routes = LookupCatalog::builtin().active_routes().to_vec();
        assert_eq!(routes.len(), 2);
        assert_eq!(routes[0].progress, 65);
    }
}
