//! Gameplay-state predicates gating key down.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Seat index reported for the driver of a vehicle.
pub const DRIVER_SEAT: u32 = 1;

/// Conjunctive set of gameplay requirements. Each `bool` gates only when `true`;
/// each set gates only when present.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RestrictionSet {
    /// Player must be aiming.
    pub is_aiming: bool,
    /// Player must not be in a vehicle.
    pub is_on_foot: bool,
    /// Player must be in a vehicle.
    pub is_vehicle: bool,
    /// Player must be driving.
    pub is_vehicle_driver: bool,
    /// Player must be in a vehicle but not driving.
    pub is_vehicle_passenger: bool,
    /// Player's vehicle model must be one of these.
    pub vehicle_models: Option<BTreeSet<u32>>,
    /// Player must be swimming.
    pub is_swimming: bool,
    /// Player must have a weapon equipped; a non-empty set also restricts its model.
    pub weapon_models: Option<BTreeSet<u32>>,
}

impl RestrictionSet {
    /// True when any predicate requires vehicle occupancy.
    fn needs_vehicle(&self) -> bool {
        self.is_vehicle
            || self.is_vehicle_driver
            || self.is_vehicle_passenger
            || self.vehicle_models.is_some()
    }
}

/// The vehicle the player occupies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vehicle {
    /// Vehicle model id.
    pub model: u32,
    /// Seat index; [`DRIVER_SEAT`] is the driver.
    pub seat: u32,
}

/// Point-in-time view of the player consumed by [`is_valid`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StateSnapshot {
    /// Player is aiming a weapon.
    pub aiming: bool,
    /// Occupied vehicle, if any.
    pub vehicle: Option<Vehicle>,
    /// Player is swimming.
    pub swimming: bool,
    /// Model id of the equipped weapon, if any.
    pub weapon: Option<u32>,
}

/// Evaluate `restrictions` against `state`. No restrictions means valid.
pub fn is_valid(restrictions: Option<&RestrictionSet>, state: &StateSnapshot) -> bool {
    let Some(r) = restrictions else {
        return true;
    };

    if r.is_aiming && !state.aiming {
        return false;
    }

    if r.is_on_foot && state.vehicle.is_some() {
        return false;
    }

    if r.needs_vehicle() {
        let Some(v) = state.vehicle else {
            return false;
        };
        if r.is_vehicle_driver && v.seat != DRIVER_SEAT {
            return false;
        }
        if r.is_vehicle_passenger && v.seat == DRIVER_SEAT {
            return false;
        }
        if let Some(models) = &r.vehicle_models
            && !models.contains(&v.model)
        {
            return false;
        }
    }

    if r.is_swimming && !state.swimming {
        return false;
    }

    if let Some(models) = &r.weapon_models {
        let Some(weapon) = state.weapon else {
            return false;
        };
        if !models.is_empty() && !models.contains(&weapon) {
            return false;
        }
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn driving(model: u32) -> StateSnapshot {
        StateSnapshot {
            vehicle: Some(Vehicle {
                model,
                seat: DRIVER_SEAT,
            }),
            ..StateSnapshot::default()
        }
    }

    fn riding(model: u32) -> StateSnapshot {
        StateSnapshot {
            vehicle: Some(Vehicle { model, seat: 2 }),
            ..StateSnapshot::default()
        }
    }

    #[test]
    fn absent_or_empty_is_valid() {
        let s = StateSnapshot::default();
        assert!(is_valid(None, &s));
        assert!(is_valid(Some(&RestrictionSet::default()), &s));
    }

    #[test]
    fn aiming() {
        let r = RestrictionSet {
            is_aiming: true,
            ..Default::default()
        };
        assert!(!is_valid(Some(&r), &StateSnapshot::default()));
        let aiming = StateSnapshot {
            aiming: true,
            ..Default::default()
        };
        assert!(is_valid(Some(&r), &aiming));
    }

    #[test]
    fn on_foot() {
        let r = RestrictionSet {
            is_on_foot: true,
            ..Default::default()
        };
        assert!(is_valid(Some(&r), &StateSnapshot::default()));
        assert!(!is_valid(Some(&r), &driving(7)));
    }

    #[test]
    fn vehicle_and_driver_are_conjunctive() {
        let r = RestrictionSet {
            is_vehicle: true,
            is_vehicle_driver: true,
            ..Default::default()
        };
        assert!(is_valid(Some(&r), &driving(7)));
        assert!(!is_valid(Some(&r), &riding(7)));
        assert!(!is_valid(Some(&r), &StateSnapshot::default()));
    }

    #[test]
    fn passenger() {
        let r = RestrictionSet {
            is_vehicle_passenger: true,
            ..Default::default()
        };
        assert!(is_valid(Some(&r), &riding(7)));
        assert!(!is_valid(Some(&r), &driving(7)));
        assert!(!is_valid(Some(&r), &StateSnapshot::default()));
    }

    #[test]
    fn vehicle_models_imply_occupancy() {
        let r = RestrictionSet {
            vehicle_models: Some([7, 9].into()),
            ..Default::default()
        };
        assert!(is_valid(Some(&r), &riding(9)));
        assert!(!is_valid(Some(&r), &driving(8)));
        assert!(!is_valid(Some(&r), &StateSnapshot::default()));
    }

    #[test]
    fn swimming() {
        let r = RestrictionSet {
            is_swimming: true,
            ..Default::default()
        };
        assert!(!is_valid(Some(&r), &StateSnapshot::default()));
        let s = StateSnapshot {
            swimming: true,
            ..Default::default()
        };
        assert!(is_valid(Some(&r), &s));
    }

    #[test]
    fn weapon_models_check_membership() {
        let r = RestrictionSet {
            weapon_models: Some([100].into()),
            ..Default::default()
        };
        let armed = |w| StateSnapshot {
            weapon: Some(w),
            ..Default::default()
        };
        assert!(!is_valid(Some(&r), &StateSnapshot::default()));
        assert!(is_valid(Some(&r), &armed(100)));
        assert!(!is_valid(Some(&r), &armed(200)));

        let any = RestrictionSet {
            weapon_models: Some(BTreeSet::new()),
            ..Default::default()
        };
        assert!(is_valid(Some(&any), &armed(200)));
        assert!(!is_valid(Some(&any), &StateSnapshot::default()));
    }

    #[test]
    fn parses_from_ron() {
        let r: RestrictionSet =
            ron::from_str("(is_vehicle: true, vehicle_models: Some([1, 2]))").unwrap();
        assert!(r.is_vehicle);
        assert_eq!(r.vehicle_models, Some([1, 2].into()));
        assert!(!r.is_aiming);
    }
}
