use std::any::Any;

use typereg::{LineBuffer, RegistryError, Reporter, TypeOps, TypeRegistry, Value};

/// Demonstrates building a device catalog on top of TypeRegistry
fn main() -> Result<(), RegistryError> {
    let mut registry = TypeRegistry::new();

    // Sensors carry their own rendering and release hooks.
    let sensor_ops = TypeOps {
        print: Some(print_sensor),
        free: Some(free_sensor),
        ..TypeOps::new()
    };

    // The first store creates the "sensor" type and freezes its contract.
    registry.store(
        "sensor",
        "bay0",
        Sensor {
            channel: 0,
            gain_db: 3,
        },
        sensor_ops,
    )?;
    registry.store(
        "sensor",
        "bay1",
        Sensor {
            channel: 1,
            gain_db: 9,
        },
        sensor_ops,
    )?;

    // Labels get by with the default rendering (bare keys).
    registry.store("label", "bay0", "intake manifold".to_owned(), TypeOps::new())?;
    registry.store("label", "bay1", "exhaust manifold".to_owned(), TypeOps::new())?;

    // Render the whole catalog, types and keys in sorted order.
    let mut out = LineBuffer::new();
    registry.print_all(&mut out);
    print!("{}", out);

    // Typed retrieval of a single sensor.
    let sensor = registry.lookup_as::<Sensor>("sensor", "bay1")?;
    println!(
        "bay1 reads on channel {} at {} dB",
        sensor.channel, sensor.gain_db
    );

    // Retiring the type pushes every sensor through free_sensor.
    registry.deregister("sensor")?;
    println!("{} type(s) left after retiring the sensors", registry.len());

    Ok(())
}

// Data structures

struct Sensor {
    channel: u8,
    gain_db: i32,
}

// Hooks for the "sensor" type

fn print_sensor(out: &mut dyn Reporter, value: &(dyn Any + Send)) {
    if let Some(sensor) = value.downcast_ref::<Sensor>() {
        out.entry_record(&format!(
            "channel {} gain {} dB",
            sensor.channel, sensor.gain_db
        ));
    }
}

fn free_sensor(value: Value) {
    if let Some(sensor) = value.downcast_ref::<Sensor>() {
        println!("releasing sensor on channel {}", sensor.channel);
    }
}
