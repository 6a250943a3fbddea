//! Lock-free parameter values shared between the control and audio threads.
//!
//! Each parameter is one `AtomicU32` holding the bits of its plain
//! (denormalized) `f32` value. The control thread (UI, automation, preset
//! loads) writes; the audio thread reads once per block. Relaxed ordering is
//! enough: every slot is independent and a value that lands mid-block is
//! simply picked up on the next one, with the ramps hiding the step.

use std::marker::PhantomData;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use super::schema::{ParamDef, ParameterSchema, SchemaError};

/// Atomic value slots, one per schema entry, in schema order.
#[derive(Debug)]
pub struct ParameterStore {
    schema: Arc<ParameterSchema>,
    values: Vec<AtomicU32>,
}

impl ParameterStore {
    /// All slots start at their defaults.
    pub fn new(schema: Arc<ParameterSchema>) -> Self {
        let values = schema
            .iter()
            .map(|def| AtomicU32::new(def.default_value().to_bits()))
            .collect();

        Self { schema, values }
    }

    pub fn schema(&self) -> &ParameterSchema {
        &self.schema
    }

    pub fn def(&self, index: usize) -> Option<&ParamDef> {
        self.schema.get(index)
    }

    /// Plain value; 0.0 for an unknown index.
    #[inline]
    pub fn get(&self, index: usize) -> f32 {
        self.values
            .get(index)
            .map_or(0.0, |slot| f32::from_bits(slot.load(Ordering::Relaxed)))
    }

    /// Store a plain value, clamped (and snapped for choices) to the definition.
    pub fn set(&self, index: usize, value: f32) {
        if let (Some(def), Some(slot)) = (self.schema.get(index), self.values.get(index)) {
            slot.store(def.constrain(value).to_bits(), Ordering::Relaxed);
        }
    }

    pub fn get_normalized(&self, index: usize) -> f32 {
        self.def(index).map_or(0.0, |def| def.normalize(self.get(index)))
    }

    pub fn set_normalized(&self, index: usize, normalized: f32) {
        if let Some(def) = self.def(index) {
            self.set(index, def.denormalize(normalized));
        }
    }

    pub fn reset_to_defaults(&self) {
        for (index, def) in self.schema.iter().enumerate() {
            self.set(index, def.default_value());
        }
    }

    /// Copy of every plain value, in schema order.
    pub fn snapshot(&self) -> Vec<f32> {
        (0..self.values.len()).map(|i| self.get(i)).collect()
    }

    /// Write back a [`snapshot`](Self::snapshot).
    pub fn restore(&self, values: &[f32]) {
        for (index, &value) in values.iter().enumerate() {
            self.set(index, value);
        }
    }

    pub fn float(&self, key: &str) -> Result<FloatParam, SchemaError> {
        FloatParam::resolve(&self.schema, key)
    }

    pub fn choice<T: Choice>(&self, key: &str) -> Result<ChoiceParam<T>, SchemaError> {
        ChoiceParam::resolve(&self.schema, key)
    }
}

/// A closed set of options selectable by a choice parameter.
pub trait Choice: Copy {
    fn from_index(index: usize) -> Self;
}

/// Handle to a continuous parameter, resolved once against the schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FloatParam {
    index: usize,
}

impl FloatParam {
    pub fn resolve(schema: &ParameterSchema, key: &str) -> Result<Self, SchemaError> {
        schema.require(key, false).map(|index| Self { index })
    }

    pub fn index(self) -> usize {
        self.index
    }

    #[inline]
    pub fn get(self, store: &ParameterStore) -> f32 {
        store.get(self.index)
    }

    pub fn set(self, store: &ParameterStore, value: f32) {
        store.set(self.index, value);
    }

    pub fn get_normalized(self, store: &ParameterStore) -> f32 {
        store.get_normalized(self.index)
    }
}

/// Handle to a choice parameter that decodes straight into `T`.
#[derive(Debug)]
pub struct ChoiceParam<T> {
    index: usize,
    _choice: PhantomData<fn() -> T>,
}

impl<T> Clone for ChoiceParam<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for ChoiceParam<T> {}

impl<T: Choice> ChoiceParam<T> {
    pub fn resolve(schema: &ParameterSchema, key: &str) -> Result<Self, SchemaError> {
        schema.require(key, true).map(|index| Self {
            index,
            _choice: PhantomData,
        })
    }

    pub fn index(self) -> usize {
        self.index
    }

    #[inline]
    pub fn get(self, store: &ParameterStore) -> T {
        T::from_index(self.selected(store))
    }

    #[inline]
    pub fn selected(self, store: &ParameterStore) -> usize {
        store.get(self.index).max(0.0) as usize
    }

    pub fn select(self, store: &ParameterStore, choice_index: usize) {
        store.set(self.index, choice_index as f32);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsp::PanningLaw;

    fn store() -> ParameterStore {
        ParameterStore::new(Arc::new(ParameterSchema::embedded().unwrap()))
    }

    #[test]
    fn starts_at_defaults() {
        let store = store();
        let gain = store.float("gain").unwrap();
        let pan = store.float("pan").unwrap();

        assert_eq!(gain.get(&store), 1.0);
        assert_eq!(pan.get(&store), 0.0);
    }

    #[test]
    fn set_clamps_to_range() {
        let store = store();
        let boost = store.float("boost").unwrap();

        boost.set(&store, 40.0);
        assert_eq!(boost.get(&store), 12.0);

        boost.set(&store, f32::NAN);
        assert_eq!(boost.get(&store), 0.0);
    }

    #[test]
    fn choice_decodes_and_snaps() {
        let store = store();
        let law = store.choice::<PanningLaw>("panningLaw").unwrap();

        store.set(law.index(), 1.4);
        assert_eq!(law.get(&store), PanningLaw::Triangle);

        law.select(&store, 7);
        assert_eq!(law.get(&store), PanningLaw::Linear);
    }

    #[test]
    fn handles_reject_wrong_kind() {
        let store = store();
        assert!(matches!(
            store.choice::<PanningLaw>("gain"),
            Err(SchemaError::KindMismatch { .. })
        ));
        assert!(matches!(
            store.float("panningLaw"),
            Err(SchemaError::KindMismatch { .. })
        ));
    }

    #[test]
    fn reset_restores_defaults() {
        let store = store();
        let gain = store.float("gain").unwrap();

        gain.set(&store, 0.2);
        store.reset_to_defaults();
        assert_eq!(gain.get(&store), 1.0);
    }

    #[test]
    fn snapshot_restore_roundtrip() {
        let store = store();
        let pan = store.float("pan").unwrap();
        pan.set(&store, -0.4);

        let saved = store.snapshot();
        store.reset_to_defaults();
        store.restore(&saved);

        assert_eq!(pan.get(&store), -0.4);
    }

    #[test]
    fn values_are_visible_across_threads() {
        let store = Arc::new(store());
        let gain = store.float("gain").unwrap();

        let writer = {
            let store = Arc::clone(&store);
            std::thread::spawn(move || gain.set(&store, 0.33))
        };
        writer.join().unwrap();

        assert_eq!(gain.get(&store), 0.33);
    }
}
