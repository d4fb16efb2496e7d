mod date;

use reqwest::Url;
use rss::{Channel, ChannelBuilder, EnclosureBuilder, GuidBuilder, ItemBuilder};
use serde_json::Value;
use time::OffsetDateTime;
use tracing::{error, warn};

/// Which record fields feed items are made of.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldMapping {
    pub title: String,
    pub link: String,
    pub date: String,

    /// Prepended verbatim to the link of every item.
    pub base_link: String,

    pub description: Option<String>,
    pub image: Option<String>,
}

impl FieldMapping {
    /// Makes an item out of a record. `idx` is only used for diagnostics.
    pub fn project(&self, idx: usize, record: &Value) -> FeedItem {
        let title = field(record, &self.title);
        let link = format!(
            "{}{}",
            self.base_link,
            field(record, &self.link).unwrap_or_default()
        );

        let date = match record.get(&self.date) {
            Some(value) => {
                let date = date::parse(value);

                if date.is_none() {
                    warn!("Could not parse the date of item #{idx}: {value}");
                }

                date
            }

            None => {
                warn!("Item #{idx} has no `{}` field", self.date);

                None
            }
        };

        let description = self
            .description
            .as_deref()
            .and_then(|name| field(record, name));
        let image = self
            .image
            .as_deref()
            .and_then(|name| field(record, name))
            .filter(|image| !image.is_empty());

        FeedItem {
            title,
            link,
            date,
            description,
            image,
        }
    }
}

/// Renders a record field as text. Missing fields and `null`s are absent.
fn field(record: &Value, name: &str) -> Option<String> {
    match record.get(name)? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        value => Some(value.to_string()),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedItem {
    pub title: Option<String>,

    /// Serves as the id of the item too.
    pub link: String,

    pub date: Option<OffsetDateTime>,
    pub description: Option<String>,
    pub image: Option<String>,
}

impl FeedItem {
    pub fn into_rss(self) -> rss::Item {
        let (link, guid) = if self.link.is_empty() {
            (None, None)
        } else {
            let guid = GuidBuilder::default()
                .value(self.link.clone())
                .permalink(Url::parse(&self.link).is_ok())
                .build();

            (Some(self.link), Some(guid))
        };

        let enclosure = self.image.map(|url| {
            let mime_type = image_mime_type(&url);

            EnclosureBuilder::default()
                .url(url)
                .length("0".to_owned())
                .mime_type(mime_type.to_owned())
                .build()
        });

        ItemBuilder::default()
            .title(self.title)
            .link(link)
            .guid(guid)
            .description(self.description)
            .enclosure(enclosure)
            .pub_date(self.date.and_then(|pub_date| {
                date::to_rfc2822(pub_date)
                    .inspect_err(|e| {
                        error!("could not format the publication date ({pub_date}): {e:#}")
                    })
                    .ok()
            }))
            .build()
    }
}

fn image_mime_type(url: &str) -> &'static str {
    let path = url.split(['?', '#']).next().unwrap_or_default();
    let extension = path
        .rsplit('/')
        .next()
        .and_then(|name| name.rsplit_once('.'))
        .map(|(_, extension)| extension.to_ascii_lowercase());

    match extension.as_deref() {
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("avif") => "image/avif",
        Some("bmp") => "image/bmp",
        Some("svg") => "image/svg+xml",
        _ => "image/jpeg",
    }
}

/// Channel-level feed metadata.
#[derive(Debug, Clone)]
pub struct FeedInfo<'a> {
    pub url: &'a str,
    pub title: &'a str,
    pub description: &'a str,
}

/// Assembles the RSS channel. Items keep the order of `records`.
pub fn build_channel(info: FeedInfo<'_>, mapping: &FieldMapping, records: &[Value]) -> Channel {
    let now = OffsetDateTime::now_utc();
    let mut channel = ChannelBuilder::default();
    channel
        .title(info.title)
        .link(info.url)
        .description(info.description)
        .last_build_date(
            date::to_rfc2822(now)
                .inspect_err(|e| error!("could not format the last build date ({now}): {e:#}"))
                .ok(),
        )
        .generator(Some(format!(
            "{} {}",
            env!("CARGO_PKG_NAME"),
            env!("CARGO_PKG_VERSION")
        )));

    for (idx, record) in records.iter().enumerate() {
        channel.item(mapping.project(idx + 1, record).into_rss());
    }

    channel.build()
}
