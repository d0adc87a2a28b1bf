use crate::models::ConversationItem;

/// A root conversation plus the branches forked from it, clustered by the
/// normalized base title. `items[0]` is always the root.
#[derive(Debug, Clone)]
pub struct Group {
    pub key: String,
    pub items: Vec<ConversationItem>,
}

impl Group {
    pub fn root(&self) -> &ConversationItem {
        &self.items[0]
    }

    pub fn branches(&self) -> &[ConversationItem] {
        &self.items[1..]
    }
}

/// Cluster conversation items into ordered root+branch groups.
///
/// Items bucket by their grouping key (base title, falling back to title and
/// then id). Within a bucket items sort ascending by creation time; buckets
/// sort by their root's creation time. Both sorts are stable, so equal
/// timestamps keep the original relative order.
pub fn build_groups(items: Vec<ConversationItem>) -> Vec<Group> {
    let mut groups: Vec<Group> = Vec::new();

    for item in items {
        let key = item.group_key().to_string();
        match groups.iter_mut().find(|g| g.key == key) {
            Some(group) => group.items.push(item),
            None => groups.push(Group { key, items: vec![item] }),
        }
    }

    for group in &mut groups {
        group.items.sort_by(|a, b| a.create_time.total_cmp(&b.create_time));
    }
    groups.sort_by(|a, b| a.items[0].create_time.total_cmp(&b.items[0].create_time));

    groups
}
