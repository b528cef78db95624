//! Builtin Bedrock Edition -> Java Edition override data.

use super::OverrideTables;
use crate::types::ValueTable;

/// States with nothing to map to on the Java side.
const NO_EFFECT_STATES: &[&str] = &[
    "update_bit",
    "persistent_bit",
    "covered_bit",
    "suspended_bit",
    "stability",
    "stability_check",
    "age_bit",
    "color",
];

/// States that must stay structural; edge-case rules decode them.
const STRUCTURAL_STATES: &[&str] = &["multi_face_direction_bits", "vine_direction_bits"];

const STATE_ALTERNATES: &[(&str, &[&str])] = &[
    ("minecraft:cardinal_direction", &["facing"]),
    ("minecraft:block_face", &["facing"]),
    ("minecraft:vertical_half", &["type", "half"]),
    ("pillar_axis", &["axis"]),
    ("open_bit", &["open"]),
    ("powered_bit", &["powered"]),
    ("attached_bit", &["attached"]),
    ("occupied_bit", &["occupied"]),
    ("in_wall_bit", &["in_wall"]),
    ("head_piece_bit", &["part"]),
    ("toggle_bit", &["powered"]),
    ("output_lit_bit", &["powered"]),
    ("growth", &["age"]),
    ("redstone_signal", &["power"]),
    ("rail_direction", &["shape"]),
    ("rail_data_bit", &["powered"]),
    ("wall_connection_type_north", &["north"]),
    ("wall_connection_type_south", &["south"]),
    ("wall_connection_type_east", &["east"]),
    ("wall_connection_type_west", &["west"]),
    ("wall_post_bit", &["up"]),
    ("liquid_depth", &["level"]),
];

const VALUE_EQUIVALENCES: &[(&str, &[&str])] = &[
    ("false", &["0"]),
    ("true", &["1"]),
    ("short", &["low"]),
    ("silver", &["light_gray"]),
];

const FACING_DIRECTION: &[(&str, &str)] = &[
    ("0", "down"),
    ("1", "up"),
    ("2", "north"),
    ("3", "south"),
    ("4", "west"),
    ("5", "east"),
];

const WEIRDO_DIRECTION: &[(&str, &str)] = &[("0", "east"), ("1", "west"), ("2", "south"), ("3", "north")];

const DIRECTION: &[(&str, &str)] = &[("0", "south"), ("1", "west"), ("2", "north"), ("3", "east")];

/// Boolean bit states whose two values map onto a named pair.
const BIT_TABLES: &[(&str, &str, &str, &str)] = &[
    ("upside_down_bit", "half", "bottom", "top"),
    ("upper_block_bit", "half", "lower", "upper"),
    ("door_hinge_bit", "hinge", "left", "right"),
    ("top_slot_bit", "type", "bottom", "top"),
    ("extinguished", "lit", "true", "false"),
];

const IDENTIFIER_RENAMES: &[(&str, &str)] = &[
    ("minecraft:grass", "minecraft:grass_block"),
    ("minecraft:web", "minecraft:cobweb"),
    ("minecraft:snow_layer", "minecraft:snow"),
    ("minecraft:snow", "minecraft:snow_block"),
    ("minecraft:trip_wire", "minecraft:tripwire"),
    ("minecraft:lit_pumpkin", "minecraft:jack_o_lantern"),
    ("minecraft:waterlily", "minecraft:lily_pad"),
    ("minecraft:reeds", "minecraft:sugar_cane"),
    ("minecraft:brick_block", "minecraft:bricks"),
    ("minecraft:stonecutter_block", "minecraft:stonecutter"),
];

pub(super) fn bedrock_to_java() -> OverrideTables {
    let mut tables = OverrideTables::new();

    for name in NO_EFFECT_STATES {
        tables.state_names.insert(name.to_string(), Some(Vec::new()));
    }
    for name in STRUCTURAL_STATES {
        tables.state_names.insert(name.to_string(), None);
    }
    for (name, alternates) in STATE_ALTERNATES {
        tables.state_names.insert(
            name.to_string(),
            Some(alternates.iter().map(|s| s.to_string()).collect()),
        );
    }

    for (value, equivalents) in VALUE_EQUIVALENCES {
        tables.value_equivalences.insert(
            value.to_string(),
            equivalents.iter().map(|s| s.to_string()).collect(),
        );
    }

    tables
        .value_tables
        .insert("facing_direction".into(), single_state_table("facing", FACING_DIRECTION));
    tables
        .value_tables
        .insert("weirdo_direction".into(), single_state_table("facing", WEIRDO_DIRECTION));
    tables
        .value_tables
        .insert("direction".into(), single_state_table("facing", DIRECTION));

    for (name, target, off, on) in BIT_TABLES {
        // Bedrock has shipped these bits both as 0/1 and as false/true.
        let pairs = [("0", *off), ("false", *off), ("1", *on), ("true", *on)];
        tables
            .value_tables
            .insert(name.to_string(), single_state_table(target, &pairs));
    }

    for (source, target) in IDENTIFIER_RENAMES {
        tables
            .identifier_renames
            .insert(source.to_string(), target.to_string());
    }

    tables
}

fn single_state_table(target: &str, pairs: &[(&str, &str)]) -> ValueTable {
    pairs
        .iter()
        .map(|(value, target_value)| {
            let mut targets = std::collections::BTreeMap::new();
            targets.insert(target.to_string(), target_value.to_string());
            (value.to_string(), targets)
        })
        .collect()
}
