use serde::Deserialize;

/// One page of an OData collection response.
#[derive(Debug, Deserialize)]
pub struct Page<T> {
    #[serde(default = "Vec::new")]
    pub value: Vec<T>,
    #[serde(rename = "@odata.nextLink")]
    pub next_link: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_value_and_next_link() {
        let raw = r#"{
            "@odata.context": "https://graph.microsoft.com/v1.0/$metadata#users('x')/messages",
            "value": [1, 2, 3],
            "@odata.nextLink": "https://graph.microsoft.com/v1.0/users/x/messages?$skip=10"
        }"#;
        let page: Page<u32> = serde_json::from_str(raw).unwrap();
        assert_eq!(page.value, vec![1, 2, 3]);
        assert_eq!(
            page.next_link.as_deref(),
            Some("https://graph.microsoft.com/v1.0/users/x/messages?$skip=10")
        );
    }

    #[test]
    fn missing_value_is_empty() {
        let page: Page<u32> = serde_json::from_str("{}").unwrap();
        assert!(page.value.is_empty());
        assert!(page.next_link.is_none());
    }
}
