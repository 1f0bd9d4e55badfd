//! The prototype indexer (spec §4.2).

use splice_core::Host;

/// Pre-order listing of `root`'s prototype tree: the root at position 0,
/// followed recursively by each nested prototype in the order they appear
/// in the root's nested-prototype list.
///
/// Both the snapshot side and the restore side must call this with
/// prototype trees produced from the same program text — prototype
/// identity across sides is established only by position in this listing,
/// never by value (spec §4.2, §3 "Function prototype").
///
/// Mirrors `original_source/checkpoint.go`'s `GetFuncProtoIdx` exactly:
/// root first, then each nested subtree fully expanded before the next
/// sibling.
pub fn index_prototypes<H: Host>(root: &H::Proto) -> Vec<H::Proto> {
    let mut protos = vec![root.clone()];
    for nested in H::proto_nested(root) {
        protos.extend(index_prototypes::<H>(&nested));
    }
    protos
}

#[cfg(test)]
mod tests {
    use super::*;
    use splice_test_utils::FakeHost;

    #[test]
    fn single_leaf_prototype() {
        let root = splice_test_utils::FakeProto::leaf(0);
        let protos = index_prototypes::<FakeHost>(&root);
        assert_eq!(protos.len(), 1);
    }

    #[test]
    fn preorder_over_nested_prototypes() {
        let inner_a = splice_test_utils::FakeProto::leaf(0);
        let inner_b = splice_test_utils::FakeProto::with_nested(0, vec![splice_test_utils::FakeProto::leaf(0)]);
        let root =
            splice_test_utils::FakeProto::with_nested(0, vec![inner_a.clone(), inner_b.clone()]);
        let protos = index_prototypes::<FakeHost>(&root);
        // root, inner_a, inner_b, inner_b's nested leaf
        assert_eq!(protos.len(), 4);
    }

    #[test]
    fn two_independent_indexings_agree_in_length_and_order() {
        let a = splice_test_utils::FakeProto::with_nested(
            0,
            vec![
                splice_test_utils::FakeProto::leaf(0),
                splice_test_utils::FakeProto::leaf(0),
            ],
        );
        let first = index_prototypes::<FakeHost>(&a);
        let second = index_prototypes::<FakeHost>(&a);
        assert_eq!(first.len(), second.len());
        for (x, y) in first.iter().zip(second.iter()) {
            assert_eq!(FakeHost::proto_identity(x), FakeHost::proto_identity(y));
        }
    }
}
