use morph_domain::entity::{Entity, PolymorphicRecord};
use morph_macros::{entity, polymorphic};

#[polymorphic]
#[entity]
#[derive(Clone)]
struct Comment {
    body: String,
}

// 已声明的判别字段保留原位置
#[polymorphic]
#[entity(type = "attachment")]
#[derive(Clone)]
struct Attachment {
    name: String,
    entity_type: String,
    entity_id: String,
}

fn main() {
    let mut c = Comment::new("c1".to_string(), 0);
    c.body = "nice".into();
    c.attach("p1".to_string(), "Post");
    assert_eq!(c.entity_id(), "p1");
    assert_eq!(c.entity_type(), "Post");

    let mut a = Attachment::default();
    a.attach("v1".to_string(), "Video");
    assert_eq!(a.entity_type, "Video");
    assert!(a.name.is_empty());
    assert_eq!(Attachment::TYPE, "attachment");
}
