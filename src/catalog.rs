//! Static landmark catalog and random selection
//!
//! Selection is uniform with replacement: consecutive rounds may repeat a
//! location. Difficulty never filters the pool - it only affects timing and
//! scoring.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// An immutable catalog entry shown to the player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    /// Latitude in decimal degrees, [-90, 90]
    pub lat: f64,
    /// Longitude in decimal degrees, [-180, 180]
    pub lng: f64,
    /// Display name
    pub name: String,
    /// One-line blurb shown after the reveal
    pub description: String,
    /// Panorama image for the guessing view
    pub image_url: String,
}

/// The pool of locations a session draws from
#[derive(Debug, Clone, Default)]
pub struct LocationCatalog {
    locations: Vec<Location>,
}

impl LocationCatalog {
    /// Build a catalog from caller-supplied locations
    pub fn new(locations: Vec<Location>) -> Self {
        Self { locations }
    }

    /// The built-in world landmark set
    pub fn builtin() -> Self {
        Self::new(builtin_locations())
    }

    pub fn len(&self) -> usize {
        self.locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    pub fn locations(&self) -> &[Location] {
        &self.locations
    }

    /// Uniform random pick, with replacement. `None` only for an empty
    /// catalog.
    pub fn random_location<R: Rng>(&self, rng: &mut R) -> Option<&Location> {
        if self.locations.is_empty() {
            return None;
        }
        let index = rng.random_range(0..self.locations.len());
        self.locations.get(index)
    }
}

fn loc(lat: f64, lng: f64, name: &str, description: &str, image_url: &str) -> Location {
    Location {
        lat,
        lng,
        name: name.to_string(),
        description: description.to_string(),
        image_url: image_url.to_string(),
    }
}

fn builtin_locations() -> Vec<Location> {
    vec![
        loc(
            48.8584,
            2.2945,
            "Eiffel Tower, Paris, France",
            "The iconic iron lattice tower on the Champ de Mars",
            "https://images.unsplash.com/photo-1511739001486-6bfe10ce785f?w=1200&q=80",
        ),
        loc(
            40.6892,
            -74.0445,
            "Statue of Liberty, New York, USA",
            "A colossal neoclassical sculpture on Liberty Island",
            "https://images.unsplash.com/photo-1485738422979-f5c462d49f74?w=1200&q=80",
        ),
        loc(
            51.5007,
            -0.1246,
            "Big Ben, London, UK",
            "The Great Bell of the striking clock at the Palace of Westminster",
            "https://images.unsplash.com/photo-1513635269975-59663e0ac1ad?w=1200&q=80",
        ),
        loc(
            27.1751,
            78.0421,
            "Taj Mahal, Agra, India",
            "An ivory-white marble mausoleum on the south bank of the Yamuna river",
            "https://images.unsplash.com/photo-1564507592333-c60657eea523?w=1200&q=80",
        ),
        loc(
            41.8902,
            12.4922,
            "Colosseum, Rome, Italy",
            "An oval amphitheatre in the centre of the city of Rome",
            "https://images.unsplash.com/photo-1552832230-c0197dd311b5?w=1200&q=80",
        ),
        loc(
            -22.9519,
            -43.2105,
            "Christ the Redeemer, Rio de Janeiro, Brazil",
            "An Art Deco statue of Jesus Christ atop Mount Corcovado",
            "https://images.unsplash.com/photo-1483729558449-99ef09a8c325?w=1200&q=80",
        ),
        loc(
            40.4319,
            116.5704,
            "Great Wall of China",
            "A series of fortifications built across northern China",
            "https://images.unsplash.com/photo-1508804185872-d7badad00f7d?w=1200&q=80",
        ),
        loc(
            37.9838,
            23.7275,
            "Acropolis of Athens, Greece",
            "An ancient citadel located on a rocky outcrop above Athens",
            "https://images.unsplash.com/photo-1555993539-1732b0258235?w=1200&q=80",
        ),
        loc(
            -33.8568,
            151.2153,
            "Sydney Opera House, Australia",
            "A multi-venue performing arts centre in Sydney Harbour",
            "https://images.unsplash.com/photo-1523059623039-a9ed027e7fad?w=1200&q=80",
        ),
        loc(
            29.9792,
            31.1342,
            "Great Pyramid of Giza, Egypt",
            "The oldest and largest of the pyramids in the Giza pyramid complex",
            "https://images.unsplash.com/photo-1572252009286-268acec5ca0a?w=1200&q=80",
        ),
        loc(
            43.7230,
            10.3966,
            "Leaning Tower of Pisa, Italy",
            "A freestanding bell tower known for its unintended tilt",
            "https://images.unsplash.com/photo-1565092556419-2e93d68cefda?w=1200&q=80",
        ),
        loc(
            13.4125,
            103.8670,
            "Angkor Wat, Cambodia",
            "A temple complex and the largest religious monument in the world",
            "https://images.unsplash.com/photo-1609137144813-7d9921338f24?w=1200&q=80",
        ),
        loc(
            37.4274,
            -122.1697,
            "Golden Gate Bridge, San Francisco, USA",
            "A suspension bridge spanning the Golden Gate strait",
            "https://images.unsplash.com/photo-1519681393784-d120267933ba?w=1200&q=80",
        ),
        loc(
            30.3285,
            35.4444,
            "Petra, Jordan",
            "An archaeological city famous for its rock-cut architecture",
            "https://images.unsplash.com/photo-1579859593892-a01fd5c88a0b?w=1200&q=80",
        ),
        loc(
            -13.1631,
            -72.5450,
            "Machu Picchu, Peru",
            "A 15th-century Inca citadel in the Andes Mountains",
            "https://images.unsplash.com/photo-1526392060635-9d6019884377?w=1200&q=80",
        ),
        loc(
            55.7558,
            37.6173,
            "Red Square, Moscow, Russia",
            "A city square separating the Kremlin from a historic merchant quarter",
            "https://images.unsplash.com/photo-1513326738677-b964603b136d?w=1200&q=80",
        ),
        loc(
            35.6762,
            139.6503,
            "Tokyo Tower, Japan",
            "A communications and observation tower in the Shiba-koen district",
            "https://images.unsplash.com/photo-1540959733332-eab4deabeeaf?w=1200&q=80",
        ),
        loc(
            25.1972,
            55.2744,
            "Burj Khalifa, Dubai, UAE",
            "The tallest structure and building in the world",
            "https://images.unsplash.com/photo-1512453979798-5ea266f8880c?w=1200&q=80",
        ),
        loc(
            41.4036,
            2.1744,
            "Sagrada Familia, Barcelona, Spain",
            "A large unfinished Roman Catholic minor basilica",
            "https://images.unsplash.com/photo-1583422409516-2895a77efded?w=1200&q=80",
        ),
        loc(
            1.2869,
            103.8547,
            "Marina Bay Sands, Singapore",
            "An integrated resort fronting Marina Bay",
            "https://images.unsplash.com/photo-1525625293386-3f8f99389edd?w=1200&q=80",
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_builtin_catalog_is_populated() {
        let catalog = LocationCatalog::builtin();
        assert_eq!(catalog.len(), 20);
        for l in catalog.locations() {
            assert!((-90.0..=90.0).contains(&l.lat), "{} lat out of range", l.name);
            assert!((-180.0..=180.0).contains(&l.lng), "{} lng out of range", l.name);
            assert!(!l.name.is_empty());
        }
    }

    #[test]
    fn test_random_location_from_empty_catalog_is_none() {
        let catalog = LocationCatalog::default();
        let mut rng = Pcg32::seed_from_u64(7);
        assert!(catalog.random_location(&mut rng).is_none());
    }

    #[test]
    fn test_random_location_deterministic_with_seed() {
        let catalog = LocationCatalog::builtin();
        let mut a = Pcg32::seed_from_u64(42);
        let mut b = Pcg32::seed_from_u64(42);
        for _ in 0..50 {
            assert_eq!(
                catalog.random_location(&mut a),
                catalog.random_location(&mut b)
            );
        }
    }

    #[test]
    fn test_random_location_covers_catalog() {
        // With replacement, but over enough draws every entry should appear
        let catalog = LocationCatalog::builtin();
        let mut rng = Pcg32::seed_from_u64(1);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..2000 {
            if let Some(l) = catalog.random_location(&mut rng) {
                seen.insert(l.name.clone());
            }
        }
        assert_eq!(seen.len(), catalog.len());
    }
}
