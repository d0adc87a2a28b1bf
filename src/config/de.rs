use serde::de::{Error, MapAccess, Visitor};
use serde::{Deserialize, Deserializer};

use crate::config::schema::IncludeBucket;

/// Custom deserializer for the include-bucket map that keeps the buckets in
/// file order. Bucket order decides which tag a title gets when several
/// buckets match, so a sorted map type would silently change results.
pub fn deserialize_include_buckets<'de, D>(deserializer: D) -> Result<Vec<IncludeBucket>, D::Error>
where
    D: Deserializer<'de>,
{
    struct BucketVisitor;

    impl<'de> Visitor<'de> for BucketVisitor {
        type Value = Vec<IncludeBucket>;

        fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
            formatter.write_str("a map of bucket name to list of terms")
        }

        fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
        where
            A: MapAccess<'de>,
        {
            let mut buckets = Vec::with_capacity(map.size_hint().unwrap_or(0));
            while let Some((name, terms)) = map.next_entry::<String, Vec<String>>()? {
                if name.trim().is_empty() {
                    return Err(Error::custom("bucket names must be non-empty strings"));
                }
                buckets.push(IncludeBucket { name, terms });
            }
            Ok(buckets)
        }
    }

    deserializer.deserialize_map(BucketVisitor)
}

/// Custom deserializer rejecting negative scores.
pub fn deserialize_min_score<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = f64::deserialize(deserializer)?;
    if value < 0.0 {
        return Err(Error::custom("min_score must be >= 0"));
    }
    Ok(value)
}
