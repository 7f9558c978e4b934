//! État de rotation : quel dashboard est actif
//!
//! `RotationState` ne possède aucun timer. Un pilote externe (client HTTP
//! qui interroge le serveur, ou tâche côté serveur) décide quand appeler
//! [`RotationState::next`].
//!
//! L'espace d'index est celui de la liste *effective* (ordre canonique ou
//! ordre personnalisé résolu), pas celui du catalogue.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::registry::DisplayItem;
use crate::{Error, Result};

/// Dashboard courant et sa position dans la liste effective
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "ledserver", derive(utoipa::ToSchema))]
pub struct CurrentDashboard {
    #[serde(flatten)]
    #[cfg_attr(feature = "ledserver", schema(inline))]
    pub item: DisplayItem,
    pub index: usize,
}

/// Index courant sur une liste ordonnée, avec horodatage du dernier changement
#[derive(Debug, Clone)]
pub struct RotationState {
    items: Vec<DisplayItem>,
    current_index: usize,
    last_changed_at: DateTime<Utc>,
}

impl RotationState {
    pub fn new(items: Vec<DisplayItem>) -> Self {
        Self {
            items,
            current_index: 0,
            last_changed_at: Utc::now(),
        }
    }

    /// Liste effective parcourue par la rotation
    pub fn items(&self) -> &[DisplayItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn last_changed_at(&self) -> DateTime<Utc> {
        self.last_changed_at
    }

    pub fn current(&self) -> Result<CurrentDashboard> {
        self.items
            .get(self.current_index)
            .map(|item| CurrentDashboard {
                item: item.clone(),
                index: self.current_index,
            })
            .ok_or(Error::EmptyRegistry)
    }

    /// Saute à l'index `index`. L'état n'est pas modifié en cas d'échec.
    pub fn set_index(&mut self, index: i64) -> Result<CurrentDashboard> {
        let len = self.items.len();
        let valid = usize::try_from(index).ok().filter(|i| *i < len);
        let Some(index) = valid else {
            return Err(Error::IndexOutOfRange { index, len });
        };
        self.move_to(index);
        self.current()
    }

    /// Avance d'un cran, en revenant à 0 après le dernier élément
    pub fn next(&mut self) -> Result<CurrentDashboard> {
        if self.items.is_empty() {
            return Err(Error::EmptyRegistry);
        }
        self.move_to((self.current_index + 1) % self.items.len());
        self.current()
    }

    /// Recule d'un cran, en revenant au dernier élément avant 0
    pub fn previous(&mut self) -> Result<CurrentDashboard> {
        let len = self.items.len();
        if len == 0 {
            return Err(Error::EmptyRegistry);
        }
        self.move_to((self.current_index + len - 1) % len);
        self.current()
    }

    /// Saute au premier dashboard dont le nom est égal à `query` ou dont
    /// l'identifiant contient `query` (insensible à la casse).
    pub fn by_name(&mut self, query: &str) -> Result<CurrentDashboard> {
        let index = self
            .items
            .iter()
            .position(|item| item.matches_query(query))
            .ok_or_else(|| Error::NotFound(query.to_string()))?;
        self.move_to(index);
        self.current()
    }

    /// Remplace l'espace d'index par une nouvelle liste effective.
    ///
    /// La position n'est pas conservée d'un ordre à l'autre : l'appelant
    /// repositionne explicitement l'index (voir `LiveManager::update_config`).
    /// Si l'ancien index n'existe plus, il est ramené à 0.
    pub fn reorder(&mut self, items: Vec<DisplayItem>) {
        self.items = items;
        if self.current_index >= self.items.len() {
            self.current_index = 0;
        }
    }

    fn move_to(&mut self, index: usize) {
        self.current_index = index;
        self.last_changed_at = Utc::now();
    }
}
