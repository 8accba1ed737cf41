use morph_domain::entity::Entity;
use morph_macros::entity;

#[entity]
#[derive(Clone)]
struct Post {
    title: String,
}

#[entity(id = u64, type = "user_account", debug = false)]
#[derive(Clone)]
struct Account {
    email: String,
}

impl std::fmt::Debug for Account {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Account(..)")
    }
}

fn main() {
    let mut post = Post::new("p1".to_string(), 0);
    post.title = "hello".into();
    assert_eq!(Post::TYPE, "Post");
    assert!(post.is_new());
    let _ = format!("{:?}", post);

    let mut account = Account::new(7, 0);
    account.stamp(8, 2);
    assert_eq!(*account.id(), 8);
    assert_eq!(account.version(), 2);
    assert_eq!(Account::TYPE, "user_account");
    assert!(account.email.is_empty());
    let _ = format!("{:?}", account);
}
