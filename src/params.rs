//! Feed request parameters as they arrive in the query string.

use crate::feed::FieldMapping;
use crate::source::DataPath;

/// The request lacks one of the required parameters (or has it empty).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MissingParameters;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedParams {
    pub url: String,
    pub title: String,
    pub description: String,
    pub data_path: Option<DataPath>,
    pub mapping: FieldMapping,
}

impl FeedParams {
    /// Builds the parameters from decoded query pairs, in the order they appeared in the query.
    ///
    /// When a name is repeated, the first value wins. Empty values count as absent.
    pub fn from_pairs(pairs: &[(String, String)]) -> Result<Self, MissingParameters> {
        let optional = |name: &str| first_value(pairs, name).map(str::to_owned);
        let required = |name: &str| optional(name).ok_or(MissingParameters);

        let url = required("url")?;
        let title = required("title")?;
        let item_title = required("item_title")?;
        let item_link = required("item_link")?;
        let item_date = required("item_date")?;

        Ok(Self {
            url,
            title,
            description: optional("description").unwrap_or_default(),
            data_path: first_value(pairs, "data_path").map(DataPath::parse),
            mapping: FieldMapping {
                title: item_title,
                link: item_link,
                date: item_date,
                base_link: optional("base_item_link").unwrap_or_default(),
                description: optional("item_description"),
                image: optional("item_image"),
            },
        })
    }
}

fn first_value<'a>(pairs: &'a [(String, String)], name: &str) -> Option<&'a str> {
    pairs
        .iter()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.as_str())
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(query: &[(&str, &str)]) -> Vec<(String, String)> {
        query
            .iter()
            .map(|&(k, v)| (k.to_owned(), v.to_owned()))
            .collect()
    }

    fn required() -> Vec<(&'static str, &'static str)> {
        vec![
            ("url", "https://api.test/posts"),
            ("title", "Posts"),
            ("item_title", "t"),
            ("item_link", "l"),
            ("item_date", "d"),
        ]
    }

    #[test]
    fn required_only() {
        let params = FeedParams::from_pairs(&pairs(&required())).unwrap();

        assert_eq!(params.url, "https://api.test/posts");
        assert_eq!(params.title, "Posts");
        assert_eq!(params.description, "");
        assert_eq!(params.data_path, None);
        assert_eq!(params.mapping.title, "t");
        assert_eq!(params.mapping.link, "l");
        assert_eq!(params.mapping.date, "d");
        assert_eq!(params.mapping.base_link, "");
        assert_eq!(params.mapping.description, None);
        assert_eq!(params.mapping.image, None);
    }

    #[test]
    fn each_required_parameter_is_checked() {
        for skipped in ["url", "title", "item_title", "item_link", "item_date"] {
            let query = required()
                .into_iter()
                .filter(|&(k, _)| k != skipped)
                .collect::<Vec<_>>();

            assert_eq!(
                FeedParams::from_pairs(&pairs(&query)),
                Err(MissingParameters),
                "accepted a query without `{skipped}`"
            );
        }
    }

    #[test]
    fn empty_required_parameter_is_missing() {
        let mut query = required();
        query[1] = ("title", "");

        assert_eq!(FeedParams::from_pairs(&pairs(&query)), Err(MissingParameters));
    }

    #[test]
    fn first_value_wins() {
        let mut query = required();
        query.push(("title", "Second"));
        query.push(("item_image", "img"));
        query.push(("item_image", "thumb"));

        let params = FeedParams::from_pairs(&pairs(&query)).unwrap();

        assert_eq!(params.title, "Posts");
        assert_eq!(params.mapping.image.as_deref(), Some("img"));
    }

    #[test]
    fn optional_parameters() {
        let mut query = required();
        query.extend([
            ("description", "All the posts"),
            ("base_item_link", "https://x.test"),
            ("item_description", "body"),
            ("item_image", ""),
            ("data_path", "data.items"),
            ("unrelated", "ignored"),
        ]);

        let params = FeedParams::from_pairs(&pairs(&query)).unwrap();

        assert_eq!(params.description, "All the posts");
        assert_eq!(params.mapping.base_link, "https://x.test");
        assert_eq!(params.mapping.description.as_deref(), Some("body"));
        assert_eq!(params.mapping.image, None);
        assert_eq!(params.data_path, Some(DataPath::parse("data.items")));
    }
}
