//! Device blocks.
//!
//! These target the sensor firmware runtime rather than plain Zig: `sen.readSensor`, `composeCbor`,
//! `transmitLorawan` and the C `sleep` are provided by the firmware, so their names are reserved.

use weft_core::lang::precedence::Rank;
use weft_graph::Node;

use super::{format_number, item_slots, option_or};
use crate::backend::text::{align_comments, prefix_lines};
use crate::backend::{EmitResult, Emission, EmitterTable, Pass};

pub(crate) fn register(table: &mut EmitterTable) {
    table.register("every", every);
    table.register("field", field);
    table.register("bme280", bme280);
    table.register("transmit_msg", transmit_msg);
    table.register("compose_msg", compose_msg);
}

/// Run the body forever, sleeping `DURATION` seconds after each pass.
fn every(node: &Node, pass: &mut Pass<'_>) -> EmitResult<Emission> {
    let duration = format_number(node.field_number("DURATION").unwrap_or(1.0));
    let body = pass.loop_body(node, "STMTS")?;
    let indent = pass.indent();
    Ok(Emission::statement(format!(
        "\n// Every {duration} seconds...\nwhile (true) {{\n{body}{indent}// Wait {duration} seconds\n{indent}_ = c.sleep({duration});\n}}\n"
    )))
}

/// One `"name", value,` pair of a CBOR message. Only meaningful inside `compose_msg`.
fn field(node: &Node, pass: &mut Pass<'_>) -> EmitResult<Emission> {
    let name = pass.quote(node.field_text("NAME").unwrap_or_default());
    let value = pass.value_or(node, "name", Rank::Atomic, "null")?;
    Ok(Emission::value(format!("{name}, {value},"), Rank::None))
}

/// Read one field of a BME280 sensor. Humidity lives in a different struct than temperature and
/// pressure.
fn bme280(node: &Node, pass: &mut Pass<'_>) -> EmitResult<Emission> {
    let reading = option_or(node, "FIELD", "temperature");
    let path = option_or(node, "PATH", "/dev/sensor/sensor_baro0");
    let sensor_struct = if reading == "humidity" {
        "struct_sensor_humi"
    } else {
        "struct_sensor_baro"
    };
    let indent = pass.indent();
    let lines = [
        "try sen.readSensor(  // Read BME280 Sensor".to_string(),
        format!("{indent}c.{sensor_struct},  // Sensor Data Struct"),
        format!("{indent}{},  // Sensor Data Field", pass.quote(reading)),
        format!("{indent}{}  // Path of Sensor Device", pass.quote(path)),
        ")".to_string(),
    ];
    Ok(Emission::value(align_comments(&lines).join("\n"), Rank::UnaryPrefix))
}

/// Send a message over LoRaWAN. An empty message is `""`.
fn transmit_msg(node: &Node, pass: &mut Pass<'_>) -> EmitResult<Emission> {
    let message = pass.value_or(node, "MSG", Rank::Atomic, "\"\"")?;
    Ok(Emission::statement(format!(
        "\n// Transmit message to LoRaWAN\ntry transmitLorawan({message});\n"
    )))
}

/// Build a CBOR message from its `ADD*` fields, one per line.
fn compose_msg(node: &Node, pass: &mut Pass<'_>) -> EmitResult<Emission> {
    let mut elements = Vec::with_capacity(node.mutation.items);
    for slot in item_slots(node) {
        elements.push(pass.value_or(node, &slot, Rank::None, "\"\"")?);
    }
    let mut code = String::from("try composeCbor(.{  // Compose CBOR Message\n");
    if !elements.is_empty() {
        code.push_str(&prefix_lines(&elements.join("\n"), pass.indent()));
        code.push('\n');
    }
    code.push_str("})");
    Ok(Emission::value(code, Rank::UnaryPrefix))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::backend::Generator;
    use weft_graph::{Mutation, Workspace};

    fn number(n: f64) -> Node {
        Node::new("math_number").with_field("NUM", n)
    }

    fn sensor(reading: &str) -> Node {
        Node::new("bme280")
            .with_field("FIELD", reading)
            .with_field("PATH", "/dev/uorb/sensor_humi0")
    }

    #[test]
    fn test_bme280_aligns_comments() {
        let generator = Generator::zig();
        let mut pass = generator.pass();
        let code = pass.render_value(Some(&sensor("humidity")), Rank::None, "").unwrap();
        assert_eq!(
            code,
            "try sen.readSensor(  // Read BME280 Sensor\n\
             \x20   c.struct_sensor_humi,     // Sensor Data Struct\n\
             \x20   \"humidity\",               // Sensor Data Field\n\
             \x20   \"/dev/uorb/sensor_humi0\"  // Path of Sensor Device\n\
             )"
        );
    }

    #[test]
    fn test_bme280_uses_baro_struct_for_temperature() {
        let generator = Generator::zig();
        let mut pass = generator.pass();
        let code = pass.render_value(Some(&sensor("temperature")), Rank::None, "").unwrap();
        assert!(code.contains("c.struct_sensor_baro,"));
    }

    #[test]
    fn test_compose_msg_indents_fields() {
        let generator = Generator::zig();
        let mut pass = generator.pass();
        let node = Node::new("compose_msg")
            .with_mutation(Mutation {
                items: 2,
                ..Mutation::default()
            })
            .with_input("ADD0", Node::new("field").with_field("NAME", "t").with_input("name", number(21.0)))
            .with_input("ADD1", Node::new("field").with_field("NAME", "p").with_input("name", number(1000.0)));
        assert_eq!(
            pass.render_value(Some(&node), Rank::None, "").unwrap(),
            "try composeCbor(.{  // Compose CBOR Message\n    \"t\", 21,\n    \"p\", 1000,\n})"
        );
    }

    #[test]
    fn test_every_wraps_body_and_transmit() {
        let message = Node::new("compose_msg");
        let body = Node::new("transmit_msg").with_input("MSG", message);
        let every = Node::new("every").with_field("DURATION", 10.0).with_statement("STMTS", body);
        let ws = Workspace::new().with_root(every);
        let code = Generator::zig().generate(&ws).unwrap();
        assert!(code.contains("// Every 10 seconds...\n    while (true) {\n"));
        assert!(code.contains("        try transmitLorawan((try composeCbor(.{  // Compose CBOR Message\n"));
        assert!(code.contains("        })));\n        // Wait 10 seconds\n        _ = c.sleep(10);\n    }\n"));
    }
}
