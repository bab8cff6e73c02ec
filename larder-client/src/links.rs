//! Store search links for a list item.

use anyhow::{bail, Context, Result};
use reqwest::Url;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Store {
    #[default]
    BigBasket,
    JioMart,
    Blinkit,
    Instamart,
}

impl Store {
    pub const ALL: [Store; 4] = [Store::BigBasket, Store::JioMart, Store::Blinkit, Store::Instamart];

    pub fn label(&self) -> &'static str {
        match self {
            Store::BigBasket => "BigBasket",
            Store::JioMart => "JioMart",
            Store::Blinkit => "Blinkit",
            Store::Instamart => "Instamart",
        }
    }
}

impl FromStr for Store {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_lowercase();
        match Store::ALL.into_iter().find(|st| st.label().to_lowercase() == wanted) {
            Some(store) => Ok(store),
            None => bail!("unknown store '{}' (expected BigBasket, JioMart, Blinkit, Instamart)", s.trim()),
        }
    }
}

/// Search URL for `item_name` on the given store, query percent-encoded.
pub fn store_search_url(store: Store, item_name: &str) -> Result<String> {
    let query = item_name.trim();
    let mut url = match store {
        Store::BigBasket => Url::parse("https://www.bigbasket.com/ps/"),
        Store::JioMart => Url::parse("https://www.jiomart.com/search"),
        Store::Blinkit => Url::parse("https://blinkit.com/s/"),
        Store::Instamart => Url::parse("https://www.swiggy.com/instamart/search"),
    }
    .context("store base url")?;

    match store {
        Store::BigBasket | Store::Blinkit => {
            url.query_pairs_mut().append_pair("q", query);
        }
        Store::JioMart => {
            url.path_segments_mut()
                .map_err(|_| anyhow::anyhow!("store url cannot take a path"))?
                .push(query);
        }
        Store::Instamart => {
            url.query_pairs_mut()
                .append_pair("query", query)
                .append_pair("custom_back", "true");
        }
    }
    Ok(url.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_urls() {
        assert_eq!(
            store_search_url(Store::BigBasket, " Amul Milk ").unwrap(),
            "https://www.bigbasket.com/ps/?q=Amul+Milk"
        );
        assert_eq!(
            store_search_url(Store::JioMart, "Amul Milk").unwrap(),
            "https://www.jiomart.com/search/Amul%20Milk"
        );
        assert_eq!(
            store_search_url(Store::Blinkit, "dal & rice").unwrap(),
            "https://blinkit.com/s/?q=dal+%26+rice"
        );
        assert_eq!(
            store_search_url(Store::Instamart, "eggs").unwrap(),
            "https://www.swiggy.com/instamart/search?query=eggs&custom_back=true"
        );
    }

    #[test]
    fn test_parse_store() {
        assert_eq!("jiomart".parse::<Store>().unwrap(), Store::JioMart);
        assert!("amazon".parse::<Store>().is_err());
    }
}
