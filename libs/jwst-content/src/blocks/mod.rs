mod image;
mod relationship;
mod structural;

pub use image::ImageBlock;
pub use relationship::RelationshipBlock;
pub use structural::StructuralBlock;

use super::*;

/// Block data with the transform bookkeeping keys stripped.
fn plain_data(node: &Element) -> Map<String, Value> {
    node.data
        .iter()
        .filter(|(key, _)| key.as_str() != constants::data::MUTATION_PATHS && key.as_str() != constants::data::JOIN_IDS)
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}
