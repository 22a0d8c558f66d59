pub mod clone;
pub mod eip;
pub mod gc;
pub mod image;
pub mod instance;
pub mod list;

/// Listings print the typed records as pretty JSON
pub(crate) fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
