//! Radio group widget state.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

use log::debug;

/// Unique identifier for a RadioGroup widget instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RadioGroupId(usize);

impl RadioGroupId {
    fn new() -> Self {
        static COUNTER: AtomicUsize = AtomicUsize::new(0);
        Self(COUNTER.fetch_add(1, Ordering::SeqCst))
    }
}

impl std::fmt::Display for RadioGroupId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "__radio_group_{}", self.0)
    }
}

/// One selectable option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RadioOption<V> {
    pub label: String,
    pub value: V,
    pub disabled: bool,
}

impl<V> RadioOption<V> {
    pub fn new(label: impl Into<String>, value: V) -> Self {
        Self {
            label: label.into(),
            value,
            disabled: false,
        }
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }
}

/// Emitted when the selected value changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RadioChange<V> {
    pub value: V,
    pub previous: Option<V>,
}

#[derive(Debug)]
struct RadioGroupInner<V> {
    /// Form field name shared by the options
    name: Option<String>,
    options: Vec<RadioOption<V>>,
    value: Option<V>,
    disabled: bool,
    events: Vec<RadioChange<V>>,
}

impl<V> Default for RadioGroupInner<V> {
    fn default() -> Self {
        Self {
            name: None,
            options: Vec::new(),
            value: None,
            disabled: false,
            events: Vec::new(),
        }
    }
}

/// A radio group widget with shared state.
///
/// Selection is value-based: `select` picks the option whose value equals
/// the argument. Clones share the same state, so a host can hold one handle
/// while the rendering layer holds another.
///
/// # Example
///
/// ```ignore
/// let theme = RadioGroup::with_options(vec![
///     RadioOption::new("Light", "light"),
///     RadioOption::new("Dark", "dark"),
/// ]);
/// theme.select(&"dark");
/// for change in theme.take_events() {
///     println!("{:?} -> {}", change.previous, change.value);
/// }
/// ```
#[derive(Debug)]
pub struct RadioGroup<V> {
    /// Unique identifier for this radio group instance
    id: RadioGroupId,
    inner: Arc<RwLock<RadioGroupInner<V>>>,
    /// Dirty flag for re-render
    dirty: Arc<AtomicBool>,
}

impl<V: Clone + PartialEq> RadioGroup<V> {
    /// Create a new empty radio group
    pub fn new() -> Self {
        Self {
            id: RadioGroupId::new(),
            inner: Arc::new(RwLock::new(RadioGroupInner::default())),
            dirty: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Create a radio group with options
    pub fn with_options(options: Vec<RadioOption<V>>) -> Self {
        Self {
            id: RadioGroupId::new(),
            inner: Arc::new(RwLock::new(RadioGroupInner {
                options,
                ..Default::default()
            })),
            dirty: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn with_name(self, name: impl Into<String>) -> Self {
        if let Ok(mut guard) = self.inner.write() {
            guard.name = Some(name.into());
        }
        self
    }

    /// Start with `value` selected, without recording a change.
    pub fn with_value(self, value: V) -> Self {
        if let Ok(mut guard) = self.inner.write() {
            guard.value = Some(value);
        }
        self
    }

    pub fn id(&self) -> RadioGroupId {
        self.id
    }

    // -------------------------------------------------------------------------
    // Read methods
    // -------------------------------------------------------------------------

    /// Get the currently selected value (if any)
    pub fn value(&self) -> Option<V> {
        self.inner
            .read()
            .map(|guard| guard.value.clone())
            .unwrap_or(None)
    }

    pub fn name(&self) -> Option<String> {
        self.inner
            .read()
            .map(|guard| guard.name.clone())
            .unwrap_or(None)
    }

    pub fn options(&self) -> Vec<RadioOption<V>> {
        self.inner
            .read()
            .map(|guard| guard.options.clone())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.inner
            .read()
            .map(|guard| guard.options.len())
            .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_disabled(&self) -> bool {
        self.inner
            .read()
            .map(|guard| guard.disabled)
            .unwrap_or(false)
    }

    /// Check if the option holding `value` is selected
    pub fn is_selected(&self, value: &V) -> bool {
        self.inner
            .read()
            .map(|guard| guard.value.as_ref() == Some(value))
            .unwrap_or(false)
    }

    /// Label of the selected option
    pub fn selected_label(&self) -> Option<String> {
        self.inner.read().ok().and_then(|guard| {
            let value = guard.value.as_ref()?;
            guard
                .options
                .iter()
                .find(|o| &o.value == value)
                .map(|o| o.label.clone())
        })
    }

    // -------------------------------------------------------------------------
    // Write methods
    // -------------------------------------------------------------------------

    /// Select the option holding `value`.
    ///
    /// Returns whether the selection changed. Unknown or disabled options,
    /// a disabled group and the current value are all ignored.
    pub fn select(&self, value: &V) -> bool {
        let Ok(mut guard) = self.inner.write() else {
            return false;
        };
        if guard.disabled || guard.value.as_ref() == Some(value) {
            return false;
        }
        match guard.options.iter().find(|o| &o.value == value) {
            Some(option) if !option.disabled => {}
            Some(_) => {
                debug!("RadioGroup {}: option is disabled", self.id);
                return false;
            }
            None => return false,
        }
        let previous = guard.value.replace(value.clone());
        guard.events.push(RadioChange {
            value: value.clone(),
            previous,
        });
        self.dirty.store(true, Ordering::SeqCst);
        true
    }

    /// Clear the selection without recording a change
    pub fn clear(&self) {
        if let Ok(mut guard) = self.inner.write()
            && guard.value.is_some()
        {
            guard.value = None;
            self.dirty.store(true, Ordering::SeqCst);
        }
    }

    /// Replace the options (clears selection if its option is gone)
    pub fn set_options(&self, options: Vec<RadioOption<V>>) {
        if let Ok(mut guard) = self.inner.write() {
            guard.options = options;
            let still_present = match &guard.value {
                Some(value) => guard.options.iter().any(|o| &o.value == value),
                None => true,
            };
            if !still_present {
                guard.value = None;
            }
            self.dirty.store(true, Ordering::SeqCst);
        }
    }

    pub fn set_disabled(&self, disabled: bool) {
        if let Ok(mut guard) = self.inner.write()
            && guard.disabled != disabled
        {
            guard.disabled = disabled;
            self.dirty.store(true, Ordering::SeqCst);
        }
    }

    /// Drain recorded changes.
    pub fn take_events(&self) -> Vec<RadioChange<V>> {
        self.inner
            .write()
            .map(|mut guard| std::mem::take(&mut guard.events))
            .unwrap_or_default()
    }

    // -------------------------------------------------------------------------
    // Dirty tracking
    // -------------------------------------------------------------------------

    /// Check if the radio group state has changed
    pub fn is_dirty(&self) -> bool {
        self.dirty.load(Ordering::SeqCst)
    }

    /// Clear the dirty flag
    pub fn clear_dirty(&self) {
        self.dirty.store(false, Ordering::SeqCst);
    }
}

impl<V> Clone for RadioGroup<V> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            inner: Arc::clone(&self.inner),
            dirty: Arc::clone(&self.dirty),
        }
    }
}

impl<V: Clone + PartialEq> Default for RadioGroup<V> {
    fn default() -> Self {
        Self::new()
    }
}
