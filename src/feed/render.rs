//! RSS 2.0 rendering of challenge records.

use chrono::{DateTime, FixedOffset};
use rss::extension::atom::{AtomExtensionBuilder, Link};
use rss::{Channel, ChannelBuilder, Guid, Item};

use crate::config::FeedConfig;
use crate::feed::html;
use crate::feed::record::{ChallengeRecord, RecordSource};

const GENERATOR: &str = concat!("challenge-feed ", env!("CARGO_PKG_VERSION"));

/// Builds the RSS document for a set of challenges.
///
/// Rendering is a pure function of the records and the feed config: no clock,
/// no I/O, and the input is never modified.
#[derive(Debug, Clone)]
pub struct FeedRenderer {
    config: FeedConfig,
}

impl FeedRenderer {
    pub fn new(config: FeedConfig) -> Self {
        Self { config }
    }

    /// Render records, newest first, into an RSS XML string.
    pub fn render(&self, records: &[ChallengeRecord]) -> String {
        let mut sorted: Vec<&ChallengeRecord> = records.iter().collect();
        sorted.sort_by(|a, b| b.date.cmp(&a.date));

        let items: Vec<Item> = sorted.into_iter().map(|r| self.item(r)).collect();
        self.channel(items).to_string()
    }

    fn channel(&self, items: Vec<Item>) -> Channel {
        let mut channel = ChannelBuilder::default()
            .title(self.config.title.clone())
            .link(self.config.site_url.clone())
            .description(self.config.description.clone())
            .generator(Some(GENERATOR.to_string()))
            .items(items)
            .build();

        if !self.config.feed_url.is_empty() {
            let mut self_link = Link::default();
            self_link.set_href(self.config.feed_url.clone());
            self_link.set_rel("self");
            self_link.set_mime_type(Some("application/rss+xml".to_string()));
            channel.set_atom_ext(AtomExtensionBuilder::default().links(vec![self_link]).build());
        }

        channel
    }

    fn item(&self, record: &ChallengeRecord) -> Item {
        let mut item = Item::default();
        item.set_title(record.name.clone());
        item.set_link(self.link(record));
        if let Some(id) = record.guid() {
            let mut guid = Guid::default();
            guid.set_value(id);
            guid.set_permalink(false);
            item.set_guid(guid);
        }
        if let Some(date) = record.date {
            item.set_pub_date(date.to_rfc2822());
        }
        item.set_description(self.description(record));
        item
    }

    /// Item link for the record's source. Missing identifiers degrade the link
    /// instead of dropping the item.
    pub fn link(&self, record: &ChallengeRecord) -> String {
        match &record.source {
            RecordSource::Marathon { problem_id, round_id } => {
                let mut link = self.config.marathon_link_base.clone();
                if let Some(round) = round_id {
                    link.push_str("&rd=");
                    link.push_str(round);
                }
                if let Some(problem) = problem_id {
                    link.push_str("&pm=");
                    link.push_str(problem);
                }
                link
            }
            RecordSource::Standard { challenge_id: Some(id), community } => {
                let mut link = format!("{}{}/", self.config.challenge_link_base, id);
                if let Some(community) = community {
                    link.push_str("?type=");
                    link.push_str(community);
                }
                link
            }
            RecordSource::Standard { challenge_id: None, .. } => self.config.site_url.clone(),
        }
    }

    /// HTML blurb for an item. Each line appears only when its data is present.
    pub fn description(&self, record: &ChallengeRecord) -> String {
        let details = &record.details;
        let mut out = String::new();

        if let Some(requirements) = &details.requirements {
            out.push_str(&html::sanitize_and_truncate(
                requirements,
                self.config.description_max_chars,
            ));
            out.push_str("<br />");
        }
        if !details.platforms.is_empty() {
            line(&mut out, "Platforms", &details.platforms.join(" / "));
        }
        if !details.technologies.is_empty() {
            line(&mut out, "Technologies", &details.technologies.join(" / "));
        }

        let prize = match (&details.total_prize, &details.first_place_prize) {
            (Some(total), Some(first)) => Some(format!("{} ({})", total, first)),
            (Some(only), None) | (None, Some(only)) => Some(only.clone()),
            (None, None) => None,
        };
        if let Some(prize) = prize {
            line(&mut out, "Prize", &prize);
        }

        let registration_start = match record.source {
            RecordSource::Standard { .. } => record.date,
            RecordSource::Marathon { .. } => None,
        };
        let period = [registration_start, details.registration_end]
            .into_iter()
            .flatten()
            .map(format_date)
            .collect::<Vec<_>>();
        if !period.is_empty() {
            line(&mut out, "Registration Period", &period.join(" - "));
        }

        if let Some(open) = &details.registration_open {
            line(&mut out, "Open for registration", open);
        }
        if let Some(due) = details.submission_end {
            line(&mut out, "Submissions Due", &format_date(due));
        }

        let kind = [details.challenge_type.as_deref(), record.community()]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>();
        if !kind.is_empty() {
            line(&mut out, "Type", &kind.join(" / "));
        }

        out
    }
}

fn line(out: &mut String, key: &str, value: &str) {
    out.push_str("<div>");
    out.push_str(key);
    out.push_str(": ");
    out.push_str(&html::escape(value));
    out.push_str("</div>");
}

/// `YYYY-MM-DD HH:MM ±HH:MM`, in the timestamp's own offset.
fn format_date(date: DateTime<FixedOffset>) -> String {
    date.format("%Y-%m-%d %H:%M %:z").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::record::{parse_timestamp, ChallengeDetails};

    fn renderer() -> FeedRenderer {
        FeedRenderer::new(FeedConfig {
            title: "Challenges".into(),
            description: "All the challenges".into(),
            feed_url: "http://feeds.example.com/challenges/feed".into(),
            site_url: "https://www.topcoder.com/".into(),
            description_max_chars: 20,
            ..FeedConfig::default()
        })
    }

    fn standard(id: &str, name: &str, date: &str) -> ChallengeRecord {
        ChallengeRecord {
            name: name.into(),
            source: RecordSource::Standard {
                challenge_id: Some(id.into()),
                community: Some("develop".into()),
            },
            date: parse_timestamp(date),
            details: ChallengeDetails::default(),
        }
    }

    fn marathon(problem: &str, round: &str, name: &str, date: &str) -> ChallengeRecord {
        ChallengeRecord {
            name: name.into(),
            source: RecordSource::Marathon {
                problem_id: Some(problem.into()),
                round_id: Some(round.into()),
            },
            date: parse_timestamp(date),
            details: ChallengeDetails::default(),
        }
    }

    #[test]
    fn test_sorted_newest_first() {
        let records = vec![
            standard("1", "Oldest", "2014-01-01T00:00:00Z"),
            marathon("9", "8", "Newest", "2014-03-01T00:00:00Z"),
            standard("2", "Middle", "2014-02-01T00:00:00Z"),
        ];
        let xml = renderer().render(&records);

        let newest = xml.find("<title>Newest</title>").unwrap();
        let middle = xml.find("<title>Middle</title>").unwrap();
        let oldest = xml.find("<title>Oldest</title>").unwrap();
        assert!(newest < middle && middle < oldest);
    }

    #[test]
    fn test_undated_records_sort_last() {
        let mut undated = standard("3", "Undated", "");
        undated.date = None;
        let records = vec![undated, standard("1", "Dated", "2014-01-01T00:00:00Z")];
        let xml = renderer().render(&records);
        assert!(xml.find("Dated</title>").unwrap() < xml.find("Undated</title>").unwrap());
    }

    #[test]
    fn test_render_is_deterministic() {
        let records = vec![
            standard("1", "A", "2014-01-01T00:00:00Z"),
            marathon("9", "8", "B", "2014-03-01T00:00:00Z"),
        ];
        let r = renderer();
        assert_eq!(r.render(&records), r.render(&records));
    }

    #[test]
    fn test_channel_metadata() {
        let xml = renderer().render(&[]);
        assert!(xml.contains("<rss"));
        assert!(xml.contains("<title>Challenges</title>"));
        assert!(xml.contains("<link>https://www.topcoder.com/</link>"));
        assert!(xml.contains("All the challenges"));
        assert!(xml.contains("http://feeds.example.com/challenges/feed"));
        assert!(!xml.contains("<item>"));
    }

    #[test]
    fn test_links_by_source() {
        let r = renderer();
        assert_eq!(
            r.link(&standard("30041234", "A", "")),
            "https://www.topcoder.com/challenge-details/30041234/?type=develop"
        );
        assert_eq!(
            r.link(&marathon("13001", "16100", "B", "")),
            "https://community.topcoder.com/longcontest/?module=ViewProblemStatement&rd=16100&pm=13001"
        );

        let mut no_id = standard("x", "C", "");
        no_id.source = RecordSource::Standard {
            challenge_id: None,
            community: None,
        };
        assert_eq!(r.link(&no_id), "https://www.topcoder.com/");
    }

    #[test]
    fn test_guid_and_pub_date() {
        let xml = renderer().render(&[marathon("13001", "16100", "MM", "2014-06-01T12:00:00-04:00")]);
        assert!(xml.contains("13001</guid>"));
        assert!(xml.contains("<pubDate>Sun, 01 Jun 2014 12:00:00 -0400</pubDate>"));
    }

    #[test]
    fn test_description_only_present_fields() {
        let r = renderer();
        let mut record = standard("1", "A", "2014-05-20T09:00:00.000-0400");
        record.details = ChallengeDetails {
            requirements: Some("<p>Build <b>a very long</b> thing that goes on</p><script>x()</script>".into()),
            platforms: vec!["Linux".into(), "AWS".into()],
            total_prize: Some("2250".into()),
            first_place_prize: Some("1500".into()),
            challenge_type: Some("Code".into()),
            ..ChallengeDetails::default()
        };

        let description = r.description(&record);
        assert!(description.starts_with("<p>Build <b>a very long</b> th...</p><br />"));
        assert!(!description.contains("script"));
        assert!(description.contains("<div>Platforms: Linux / AWS</div>"));
        assert!(description.contains("<div>Prize: 2250 (1500)</div>"));
        assert!(description.contains("<div>Registration Period: 2014-05-20 09:00 -04:00</div>"));
        assert!(description.contains("<div>Type: Code / develop</div>"));
        assert!(!description.contains("Technologies"));
        assert!(!description.contains("Submissions Due"));
        assert!(!description.contains("undefined"));
    }

    #[test]
    fn test_marathon_description_is_empty() {
        let record = marathon("1", "2", "MM", "2014-06-01T12:00:00Z");
        assert_eq!(renderer().description(&record), "");
    }

    #[test]
    fn test_description_values_are_escaped() {
        let mut record = standard("1", "A", "");
        record.details.technologies = vec!["<script>".into(), "C&C++".into()];
        let description = renderer().description(&record);
        assert!(description.contains("Technologies: &lt;script&gt; / C&amp;C++"));
    }
}
