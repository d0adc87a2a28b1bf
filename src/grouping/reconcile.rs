use crate::models::Message;
use crate::utils::normalize_text;

/// Length of the longest common prefix of two projected message sequences.
fn longest_common_prefix_len(a: &[(String, String)], b: &[(String, String)]) -> usize {
    a.iter().zip(b.iter()).take_while(|(x, y)| x == y).count()
}

fn project(msgs: &[Message]) -> Vec<(String, String)> {
    msgs.iter().map(|m| (m.role.clone(), normalize_text(&m.text))).collect()
}

/// Return only the branch messages that are new relative to the root.
///
/// Messages compare on a (role, whitespace-normalized text) projection; the
/// output is the unmodified branch suffix past the longest common prefix.
/// A branch whose early messages were edited fails the prefix match and is
/// re-rendered in full, which is the intended conservative behavior.
pub fn trim_branch_new_part(root_msgs: &[Message], branch_msgs: &[Message]) -> Vec<Message> {
    let k = longest_common_prefix_len(&project(root_msgs), &project(branch_msgs));
    branch_msgs[k..].to_vec()
}
