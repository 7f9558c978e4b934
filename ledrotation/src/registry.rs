//! Catalogue des dashboards disponibles
//!
//! Le catalogue est figé à la construction : aucune insertion ni suppression
//! n'est possible ensuite. Seul l'ordre de parcours peut être personnalisé,
//! via [`RotationConfig`](crate::RotationConfig).

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Un dashboard affichable
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ledserver", derive(utoipa::ToSchema))]
pub struct DisplayItem {
    /// Libellé lisible (unique par convention)
    pub name: String,
    /// Chemin de navigation, ex: `/dashboard/weather-time`
    #[serde(rename = "url", alias = "identifier")]
    pub identifier: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl DisplayItem {
    pub fn new(
        name: impl Into<String>,
        identifier: impl Into<String>,
        description: Option<&str>,
    ) -> Self {
        Self {
            name: name.into(),
            identifier: identifier.into(),
            description: description.map(str::to_string),
        }
    }

    /// Correspondance utilisée pour résoudre `dashboardOrder` :
    /// nom exact ou sous-chaîne de l'identifiant, sensible à la casse.
    pub fn matches_order_entry(&self, entry: &str) -> bool {
        self.name == entry || self.identifier.contains(entry)
    }

    /// Correspondance utilisée pour la navigation par nom :
    /// nom égal ou sous-chaîne de l'identifiant, insensible à la casse.
    pub fn matches_query(&self, query: &str) -> bool {
        let query = query.to_lowercase();
        self.name.to_lowercase() == query || self.identifier.to_lowercase().contains(&query)
    }
}

/// Catalogue ordonné et immuable des dashboards
///
/// Le clonage est bon marché : la liste est partagée via un `Arc`.
#[derive(Debug, Clone)]
pub struct DashboardRegistry {
    items: Arc<[DisplayItem]>,
}

impl DashboardRegistry {
    /// Construit un catalogue à partir d'une liste non vide
    pub fn new(items: Vec<DisplayItem>) -> Result<Self> {
        if items.is_empty() {
            return Err(Error::EmptyRegistry);
        }
        Ok(Self {
            items: items.into(),
        })
    }

    /// Catalogue intégré des dashboards servis par le serveur
    pub fn builtin() -> Self {
        let items: Vec<DisplayItem> = BUILTIN_DASHBOARDS
            .iter()
            .map(|(slug, name, description)| {
                DisplayItem::new(*name, format!("/dashboard/{slug}"), Some(*description))
            })
            .collect();
        Self {
            items: items.into(),
        }
    }

    /// Liste canonique, en lecture seule
    pub fn list(&self) -> &[DisplayItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Premier dashboard correspondant à une entrée de `dashboardOrder`
    pub fn resolve(&self, entry: &str) -> Option<&DisplayItem> {
        self.items.iter().find(|item| item.matches_order_entry(entry))
    }

    /// Résout une liste d'entrées en respectant l'ordre demandé.
    ///
    /// Les entrées inconnues sont ignorées. Si rien n'est résolu, la liste
    /// canonique complète est retournée.
    pub fn ordered(&self, order: &[String]) -> Vec<DisplayItem> {
        let resolved: Vec<DisplayItem> = order
            .iter()
            .filter_map(|entry| self.resolve(entry))
            .cloned()
            .collect();

        if resolved.is_empty() {
            self.items.to_vec()
        } else {
            resolved
        }
    }
}

/// (slug, nom, description)
const BUILTIN_DASHBOARDS: &[(&str, &str, &str)] = &[
    ("weather-time", "Weather & Time", "Weather info (top) and current time (bottom)"),
    ("sports-scores", "Sports Scores", "Live sports scores cycling through active games"),
    ("matrix-effect", "Matrix Effect", "Animated matrix-style digital rain effect"),
    ("stock-ticker", "Stock Ticker", "Scrolling stock prices with live updates and colors"),
    ("fish-tank", "Fish Tank", "Animated aquarium with swimming fish, bubbles, and plants at 75fps"),
    ("space-invaders", "Space Invaders", "Retro arcade game with animated aliens and starfield background"),
    ("pacman-maze", "Pac-Man Maze", "Animated Pac-Man eating dots through a randomly generated maze"),
    ("bouncing-balls", "Bouncing Balls", "Colorful physics simulation with bouncing balls and trails"),
    ("fire-effect", "Fire Effect", "Realistic fire animation using solid colors for LED display"),
    ("starfield", "Starfield", "3D starfield effect with moving stars and hyperspace jumps"),
    // Animation & effets visuels
    ("rain-effect", "Rain Effect", "Animated falling raindrops with puddle ripples and lightning"),
    ("snow-globe", "Snow Globe", "Swirling snow particles in a winter scene with trees and house"),
    ("lava-lamp", "Lava Lamp", "Blob-like shapes rising and falling with heat effects"),
    ("lightning-storm", "Lightning Storm", "Dark clouds with occasional lightning flashes and rain"),
    ("dna-helix", "DNA Helix", "Rotating double helix with particle effects and base pairs"),
    // Jeux rétro
    ("breakout-arkanoid", "Breakout/Arkanoid", "Ball bouncing and breaking blocks with particle effects"),
    ("centipede", "Centipede", "Segmented creature moving through obstacles and mushrooms"),
    ("frogger", "Frogger", "Cars and logs moving across lanes with animated frogs"),
    ("tetris", "Tetris", "Falling blocks with line clearing and AI gameplay"),
    ("snake-game", "Snake Game", "Classic snake growing as it eats food with AI control"),
    // Nature
    ("growing-tree", "Growing Tree", "Branches slowly growing and leaves falling in seasons"),
    ("ant-colony", "Ant Colony", "Ants following pheromone trails between food and anthill"),
    ("wave-pool", "Wave Pool", "Water waves with floating objects and particle effects"),
    ("coral-reef", "Coral Reef", "Swaying coral and swimming tropical fish with bubbles"),
    ("fireflies", "Fireflies", "Glowing insects floating in darkness with nature sounds"),
    // Abstrait & géométrique
    ("mandala-generator", "Mandala Generator", "Rotating geometric patterns with evolving sacred geometry"),
    ("particle-fountain", "Particle Fountain", "Particles spraying up and falling with physics simulation"),
    ("maze-runner", "Maze Runner", "Automatically solving mazes with pathfinding algorithms"),
    ("game-of-life", "Game of Life", "Cellular automaton with evolving patterns and generations"),
    ("plasma-effect", "Plasma Effect", "Smooth color waves using solid color transitions"),
    // Interactif
    ("audio-visualizer", "Audio Visualizer", "Bars reacting to system audio with frequency analysis"),
    ("clock-tower", "Clock Tower", "Animated analog clock with moving parts and architecture"),
    ("binary-rain", "Binary Rain", "Falling 1s and 0s like Matrix code with scan lines"),
    ("scrolling-text", "Scrolling Text", "Customizable message banner with color effects"),
    ("weather-radar", "Weather Radar", "Animated weather patterns with radar sweep"),
    // Saisonnier
    ("halloween-pumpkins", "Halloween Pumpkins", "Carved pumpkins with flickering candles and spooky atmosphere"),
    ("christmas-tree", "Christmas Tree", "Animated lights and falling snow with winter scene"),
    ("fireworks", "Fireworks", "Exploding colorful particles with realistic physics"),
    ("easter-eggs", "Easter Eggs", "Bouncing decorated eggs with spring flowers and bunny"),
    ("heart-beat", "Heart Beat", "Pulsing heart for Valentine's Day with ECG waveform"),
];
