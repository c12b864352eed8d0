use jsonflate::{
    CompressionOptions, DeserializeOptions, SerializeOptions, deserialize, serialize, stringify,
};
use serde_json::{Value, json};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .format_timestamp(None)
        .format_target(false)
        .init();

    let value = json!({ "a": 1, "b": [true, null, "x"] });
    let opts = SerializeOptions::with_zlib(CompressionOptions::default().with_level(9));

    let bytes = serialize(Some(&value), &opts)?;
    let restored: Option<Value> = deserialize(&bytes, &opts.matching_deserialize())?;
    assert_eq!(restored.as_ref(), Some(&value));

    println!(
        "encoded {} text bytes -> {} bytes -> restored {}",
        stringify(&value)?.len(),
        bytes.len(),
        restored.map(|v| v.to_string()).unwrap_or_default()
    );

    let absent = serialize::<Value>(None, &SerializeOptions::default())?;
    println!("absent value -> {} bytes", absent.len());

    // Failures carry a tagged report.
    if let Err(err) = deserialize::<Value>(&[1, 2, 3], &DeserializeOptions::default()) {
        println!("{}", serde_json::to_string(&err.report())?);
    }

    Ok(())
}
