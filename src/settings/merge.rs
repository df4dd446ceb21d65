//! Layered settings resolution.
//!
//! Settings layers are JSON objects.  [`merge_values`] folds them key by key: nested objects
//! merge recursively, every other value (arrays included) replaces the previous one, and a
//! missing key or an explicit `null` leaves the earlier value in place.  [`resolve`] runs the
//! fold over the built-in defaults, a template theme and a per-document override, and is the
//! single place where settings defaults are applied.

use log::{debug, warn};
use serde_json::{Map, Value};

use super::{EffectiveSettings, LayoutSettings};

/// Folds `overrides` over `base`, later layers winning per key.
pub fn merge_values(base: &Value, overrides: &[&Value]) -> Value {
    let mut merged = base.clone();
    for layer in overrides {
        merge_into(&mut merged, layer);
    }
    merged
}

fn merge_into(target: &mut Value, layer: &Value) {
    match (target, layer) {
        (_, Value::Null) => {}
        (Value::Object(target), Value::Object(layer)) => {
            for (key, value) in layer {
                if value.is_null() {
                    continue;
                }
                match target.get_mut(key) {
                    Some(existing) => merge_into(existing, value),
                    None => {
                        target.insert(key.clone(), value.clone());
                    }
                }
            }
        }
        (target, layer) => *target = layer.clone(),
    }
}

/// Resolves the effective settings for one render.
///
/// `layers` are applied in order over `base`, typically the template theme followed by the
/// document override.  Keys whose values do not fit the settings schema are dropped with a
/// warning and the earlier value is kept, so resolution never fails.
pub fn resolve(base: &LayoutSettings, layers: &[&Value]) -> EffectiveSettings {
    let mut current = match serde_json::to_value(base) {
        Ok(value) => value,
        Err(err) => {
            warn!("Unable to serialize base settings ({}); overrides ignored", err);
            return EffectiveSettings::new(base.clone());
        }
    };

    for (index, layer) in layers.iter().enumerate() {
        let Value::Object(entries) = layer else {
            if !layer.is_null() {
                warn!("Settings layer {} is not an object; ignoring it", index);
            }
            continue;
        };

        let merged = merge_values(&current, &[*layer]);
        if serde_json::from_value::<LayoutSettings>(merged.clone()).is_ok() {
            current = merged;
            continue;
        }

        for (key, value) in entries {
            let mut single = Map::new();
            single.insert(key.clone(), value.clone());
            let candidate = merge_values(&current, &[&Value::Object(single)]);
            match serde_json::from_value::<LayoutSettings>(candidate.clone()) {
                Ok(_) => current = candidate,
                Err(err) => warn!(
                    "Ignoring settings override `{}` in layer {}: {}",
                    key, index, err
                ),
            }
        }
    }

    match serde_json::from_value(current) {
        Ok(settings) => EffectiveSettings::new(settings),
        Err(err) => {
            debug!("Merged settings failed to deserialize: {}", err);
            EffectiveSettings::new(base.clone())
        }
    }
}
