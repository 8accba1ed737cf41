use morph_domain::entity::PolymorphicRecord;
use morph_domain::error::DomainResult;
use morph_domain::polymorphic::{Accessor, PolymorphicRepository, declare};
use morph_domain::repository::{InMemoryRepository, RepositoryExt, RepositoryManager};
use morph_macros::{entity, polymorphic};
use std::sync::Arc;

#[polymorphic]
#[entity]
#[derive(Clone)]
struct Comment {
    body: String,
}

#[entity]
#[derive(Clone)]
struct Post {
    title: String,
    #[serde(skip)]
    comments: Option<Vec<Comment>>,
}

#[entity(type = "video")]
#[derive(Clone)]
struct Video {
    title: String,
    #[serde(skip)]
    comments: Option<Vec<Comment>>,
}

fn ids() -> String {
    ulid::Ulid::new().to_string()
}

#[tokio::main]
async fn main() -> DomainResult<()> {
    println!("=== 多态关联示例：帖子与视频共享评论 ===\n");

    // 启动阶段登记声明
    declare::<Post, Comment>("comments", Accessor::Many(|p| &mut p.comments));
    declare::<Video, Comment>("comments", Accessor::Many(|v| &mut v.comments));

    let manager = Arc::new(RepositoryManager::new());
    manager.register::<Comment, _>(Arc::new(InMemoryRepository::<Comment>::new(ids)));

    let posts: PolymorphicRepository<Post, _> =
        PolymorphicRepository::new(Arc::new(InMemoryRepository::new(ids)), manager.clone());
    let videos: PolymorphicRepository<Video, _> =
        PolymorphicRepository::new(Arc::new(InMemoryRepository::new(ids)), manager.clone());

    let post = Post {
        title: "Hello".into(),
        comments: Some(vec![
            Comment {
                body: "first!".into(),
                ..Default::default()
            },
            Comment {
                body: "nice post".into(),
                ..Default::default()
            },
        ]),
        ..Default::default()
    };
    let post = posts.save_one(post).await?;
    let count = post.comments.as_ref().map_or(0, Vec::len);
    println!("✅ 保存帖子 {}，评论 {} 条", post.id, count);

    let video = Video {
        title: "Demo".into(),
        comments: Some(vec![Comment {
            body: "great video".into(),
            ..Default::default()
        }]),
        ..Default::default()
    };
    let video = videos.save_one(video).await?;
    println!("✅ 保存视频 {}", video.id);

    println!("\n--- 重新读取 ---");
    if let Some(found) = posts.find_by_id(&post.id).await? {
        for c in found.comments.unwrap_or_default() {
            println!("post  {} <- [{} {}] {}", found.id, c.entity_type(), c.entity_id(), c.body);
        }
    }
    if let Some(found) = videos.find_by_id(&video.id).await? {
        for c in found.comments.unwrap_or_default() {
            println!("video {} <- [{} {}] {}", found.id, c.entity_type(), c.entity_id(), c.body);
        }
    }

    Ok(())
}
