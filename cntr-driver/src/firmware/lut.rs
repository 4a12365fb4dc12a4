use std::collections::BTreeMap;

use derive_more::Deref;
use itertools::Itertools;

use crate::error::CntrDriverError;

/// The routing hardware addresses its LUT memory through this mask, so slot
/// values wrap into `[0, 64)` regardless of the declared LUT depth. Negative
/// inputs (falling-edge channels) rely on the wrap.
const SLOT_MASK: i32 = 0x3F;

/// Physical input slots routed to one logical channel.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum SlotAssignment {
    /// A single physical input.
    Single(i32),
    /// Several physical inputs accumulated into one logical channel.
    Multi(Vec<i32>),
}

impl SlotAssignment {
    fn slots(&self) -> &[i32] {
        match self {
            Self::Single(value) => std::slice::from_ref(value),
            Self::Multi(values) => values,
        }
    }
}

impl From<i32> for SlotAssignment {
    fn from(value: i32) -> Self {
        Self::Single(value)
    }
}

impl From<Vec<i32>> for SlotAssignment {
    fn from(values: Vec<i32>) -> Self {
        Self::Multi(values)
    }
}

impl<const N: usize> From<[i32; N]> for SlotAssignment {
    fn from(values: [i32; N]) -> Self {
        Self::Multi(values.to_vec())
    }
}

/// Flat channel routing LUT in the layout the hardware expects.
///
/// Each slot holds the logical channel its physical input routes to;
/// unassigned slots hold the discard sentinel, which is the physical
/// channel count (one past the largest routable channel).
#[derive(Deref, Clone, PartialEq, Eq, Debug)]
pub struct ChannelLut {
    #[deref]
    flat: Vec<u32>,
    desired_channels: u32,
}

impl ChannelLut {
    /// Builds the flat LUT from a logical channel assignment.
    ///
    /// Keys must form a dense 0-based enumeration below the physical
    /// channel count. Slot values are wrapped through the hardware slot
    /// mask before use; two values landing on the same slot are rejected.
    /// Nothing is validated against hardware state, so a failed build
    /// leaves any previous configuration untouched.
    pub fn build(
        assignment: &BTreeMap<u32, SlotAssignment>,
        number_of_channels: u32,
        lut_depth: usize,
    ) -> Result<Self, CntrDriverError> {
        let discard = number_of_channels;

        if let Some(&key) = assignment
            .keys()
            .find(|&&key| key as usize >= assignment.len())
        {
            return Err(CntrDriverError::ChannelKeyOutOfRange {
                key,
                max: assignment.len() as u32,
            });
        }

        let mut flat = vec![discard; lut_depth];
        for (&key, slots) in assignment {
            if key >= number_of_channels {
                return Err(CntrDriverError::ChannelKeyOutOfRange {
                    key,
                    max: number_of_channels,
                });
            }
            for &value in slots.slots() {
                let slot = (value & SLOT_MASK) as usize;
                if slot >= lut_depth {
                    return Err(CntrDriverError::SlotOutOfRange { slot, lut_depth });
                }
                if flat[slot] != discard {
                    return Err(CntrDriverError::SlotCollision { slot });
                }
                flat[slot] = key;
            }
        }

        Ok(Self {
            flat,
            desired_channels: assignment.len() as u32,
        })
    }

    /// Assignment routing logical channel `i` to physical input `i + 1`.
    #[must_use]
    pub fn default_assignment(number_of_channels: u32) -> BTreeMap<u32, SlotAssignment> {
        (0..number_of_channels)
            .map(|i| (i, SlotAssignment::Single(i as i32 + 1)))
            .collect()
    }

    /// Groups a flat LUT back into slot indices per logical channel.
    ///
    /// Inverse of [`ChannelLut::build`] up to the slot masking: channel keys
    /// ascend, and so do the slot indices within each channel.
    #[must_use]
    pub fn decode(flat: &[u32], number_of_channels: u32) -> BTreeMap<u32, Vec<u32>> {
        flat.iter()
            .enumerate()
            .filter(|&(_, &channel)| channel < number_of_channels)
            .map(|(slot, &channel)| (channel, slot as u32))
            .into_group_map()
            .into_iter()
            .collect()
    }

    /// Number of logical channels the assignment routes.
    #[must_use]
    pub const fn desired_channels(&self) -> u32 {
        self.desired_channels
    }
}
