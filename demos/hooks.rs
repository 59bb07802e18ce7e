use std::any::Any;
use std::cmp::Ordering;

use typereg::{LineBuffer, RegistryError, Reporter, TypeOps, TypeRegistry, Value};

/// Demonstrates the full hook set: parse raw protocol arguments into
/// stored values, then compare and copy them through the type's contract.
fn main() -> Result<(), RegistryError> {
    let mut registry = TypeRegistry::new();

    let gain_ops = TypeOps {
        print: Some(print_gain),
        copy: Some(copy_gain),
        compare: Some(compare_gain),
        parse: Some(parse_gain),
        ..TypeOps::new()
    };
    registry.register("gain", gain_ops)?;

    // Requests arrive as raw argument lists; the type's parse hook turns
    // them into stored values.
    let requests: &[(&str, &[&str])] = &[("adc0", &["3"]), ("adc1", &["11"]), ("adc2", &["7"])];
    for (key, args) in requests {
        if let Some(parse) = gain_ops.parse {
            match parse(args) {
                Some(value) => registry.store_boxed("gain", key, value, gain_ops)?,
                None => println!("could not parse a gain from {:?}", args),
            }
        }
    }

    // Compare two stored gains through the compare hook.
    if let (Some(compare), Ok(a), Ok(b)) = (
        gain_ops.compare,
        registry.lookup("gain", "adc0"),
        registry.lookup("gain", "adc1"),
    ) {
        match compare(a, b) {
            Ordering::Less => println!("adc0 is quieter than adc1"),
            Ordering::Equal => println!("adc0 and adc1 match"),
            Ordering::Greater => println!("adc0 is louder than adc1"),
        }
    }

    // Duplicate one gain into a backup slot through the copy hook. The
    // copy is owned, so the registry is free for the store that follows.
    let duplicate = match (gain_ops.copy, registry.lookup("gain", "adc2")) {
        (Some(copy), Ok(value)) => copy(value),
        _ => None,
    };
    if let Some(value) = duplicate {
        registry.store_boxed("gain", "adc2-backup", value, gain_ops)?;
    }

    let mut out = LineBuffer::new();
    registry.print_all(&mut out);
    print!("{}", out);

    Ok(())
}

// Hooks for the "gain" type

fn print_gain(out: &mut dyn Reporter, value: &(dyn Any + Send)) {
    if let Some(gain) = value.downcast_ref::<i32>() {
        out.entry_record(&format!("{} dB", gain));
    }
}

fn copy_gain(value: &(dyn Any + Send)) -> Option<Value> {
    value
        .downcast_ref::<i32>()
        .map(|gain| Box::new(*gain) as Value)
}

fn compare_gain(a: &(dyn Any + Send), b: &(dyn Any + Send)) -> Ordering {
    match (a.downcast_ref::<i32>(), b.downcast_ref::<i32>()) {
        (Some(a), Some(b)) => a.cmp(b),
        _ => Ordering::Equal,
    }
}

fn parse_gain(args: &[&str]) -> Option<Value> {
    let first = args.first()?;
    first.parse::<i32>().ok().map(|gain| Box::new(gain) as Value)
}
