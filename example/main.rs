use multidict::{CiMutableMultiMap, MultiMapError, MutableMultiMap};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let query = std::env::args()
        .nth(1)
        .unwrap_or_else(|| String::from("tag=rust&page=1&tag=http&sort=asc"));

    let mut params: MutableMultiMap<String, String> = serde_urlencoded::from_str(&query)?;
    log::info!("parsed {} pairs from query", params.len());

    println!("> {query}");
    println!("keys:   {:?}", params.keys(false));
    println!("items:  {:?}", params.items(true));

    match params.getall("tag") {
        Ok(tags) => println!("tags:   {:?}", tags.collect::<Vec<_>>()),
        Err(err) => println!("tags:   {err}"),
    }

    params.add("tag".into(), "map".into());
    params.insert("page".into(), "2".into());

    if let Err(MultiMapError::NotSupported(op)) = params.update([("page".to_owned(), "3".to_owned())]) {
        log::warn!("{op:?} refused");
    }

    println!("< {}", serde_urlencoded::to_string(&params)?);

    let mut headers = CiMutableMultiMap::new();
    headers.add("Accept", "text/html");
    headers.add("accept", "application/json");
    headers.setdefault("Host", "localhost");

    for key in &headers {
        println!("{key}: {:?}", headers.getall(key)?.collect::<Vec<_>>());
    }

    Ok(())
}
