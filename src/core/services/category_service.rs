use rand::Rng;

use crate::domain::{Color, FinanceState, RecordKind};
use crate::storage::{snapshot, KeyValueStore};

use super::{ServiceError, ServiceResult};

/// Owns the per-kind category lists and the category color map.
pub struct CategoryService;

impl CategoryService {
    pub fn list(state: &FinanceState, kind: RecordKind) -> &[String] {
        state.categories.get(kind)
    }

    /// Appends a trimmed, non-blank, not-yet-listed name and persists the list.
    pub fn add(
        state: &mut FinanceState,
        store: &dyn KeyValueStore,
        kind: RecordKind,
        name: &str,
    ) -> ServiceResult<()> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ServiceError::Validation(
                "Category name must not be blank".into(),
            ));
        }
        if state.categories.contains(kind, name) {
            return Err(ServiceError::Validation(format!(
                "Category `{}` already exists",
                name
            )));
        }
        let mut next = state.categories.get(kind).to_vec();
        next.push(name.to_string());
        snapshot::save_categories(store, kind, &next)?;
        state.categories.set(kind, next);
        tracing::info!(%kind, category = name, "category added");
        Ok(())
    }

    /// Removes the entry at `index`. Records already using it are untouched.
    pub fn remove_at(
        state: &mut FinanceState,
        store: &dyn KeyValueStore,
        kind: RecordKind,
        index: usize,
    ) -> ServiceResult<String> {
        let current = state.categories.get(kind);
        if index >= current.len() {
            return Err(ServiceError::InvalidIndex {
                index,
                len: current.len(),
            });
        }
        let mut next = current.to_vec();
        let removed = next.remove(index);
        snapshot::save_categories(store, kind, &next)?;
        state.categories.set(kind, next);
        tracing::info!(%kind, category = %removed, "category removed");
        Ok(removed)
    }

    /// Stores a user-chosen color for the category, replacing any previous one.
    pub fn set_color(
        state: &mut FinanceState,
        store: &dyn KeyValueStore,
        kind: RecordKind,
        category: &str,
        color: Color,
    ) -> ServiceResult<()> {
        let mut next = state.colors.clone();
        next.insert(kind, category, color);
        snapshot::save_colors(store, &next)?;
        state.colors = next;
        tracing::info!(%kind, category, %color, "category color set");
        Ok(())
    }

    /// Returns the color for `(kind, category)`, assigning and persisting a
    /// random one on first sight.
    ///
    /// This is a read with a write effect: the first call for an unseen
    /// category writes the color map; later calls return the stored color and
    /// never write.
    pub fn resolve_color(
        state: &mut FinanceState,
        store: &dyn KeyValueStore,
        kind: RecordKind,
        category: &str,
    ) -> ServiceResult<Color> {
        Self::resolve_color_with(state, store, kind, category, &mut rand::thread_rng())
    }

    pub fn resolve_color_with<R: Rng + ?Sized>(
        state: &mut FinanceState,
        store: &dyn KeyValueStore,
        kind: RecordKind,
        category: &str,
        rng: &mut R,
    ) -> ServiceResult<Color> {
        if let Some(color) = state.colors.get(kind, category) {
            return Ok(color);
        }
        let color = Color::random(rng);
        let mut next = state.colors.clone();
        next.insert(kind, category, color);
        snapshot::save_colors(store, &next)?;
        state.colors = next;
        tracing::debug!(%kind, category, %color, "category color assigned");
        Ok(color)
    }
}
