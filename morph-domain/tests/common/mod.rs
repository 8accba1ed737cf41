// 各测试二进制只使用其中一部分夹具
#![allow(dead_code)]

use async_trait::async_trait;
use morph_domain::entity::Entity;
use morph_domain::error::{DomainError, DomainResult};
use morph_domain::polymorphic::{Accessor, PolymorphicRepository, Registry};
use morph_domain::repository::{
    Criteria, InMemoryRepository, Patch, Repository, RepositoryExt, RepositoryManager,
    SaveOptions, UpdateResult,
};
use morph_macros::{entity, polymorphic};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tracing_subscriber::EnvFilter;

#[polymorphic]
#[entity]
#[derive(Clone, PartialEq)]
pub struct Comment {
    pub body: String,
}

#[polymorphic]
#[entity]
#[derive(Clone, PartialEq)]
pub struct Image {
    pub url: String,
}

#[entity]
#[derive(Clone)]
pub struct Post {
    pub title: String,
    #[serde(skip)]
    pub comments: Option<Vec<Comment>>,
    #[serde(skip)]
    pub cover: Option<Image>,
}

#[entity]
#[derive(Clone)]
pub struct Video {
    pub title: String,
    #[serde(skip)]
    pub comments: Option<Vec<Comment>>,
}

#[entity]
#[derive(Clone, PartialEq)]
pub struct Tag {
    pub label: String,
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("morph_domain=debug")),
        )
        .with_test_writer()
        .try_init();
}

pub fn store<T>() -> Arc<InMemoryRepository<T>>
where
    T: Entity + serde::Serialize + serde::de::DeserializeOwned,
    T::Id: Default + PartialEq + From<String>,
{
    Arc::new(InMemoryRepository::new(|| ulid::Ulid::new().to_string().into()))
}

pub fn post(id: &str, title: &str) -> Post {
    Post {
        id: id.to_string(),
        title: title.to_string(),
        ..Default::default()
    }
}

pub fn comment(body: &str) -> Comment {
    Comment {
        body: body.to_string(),
        ..Default::default()
    }
}

/// 统计调用次数并可注入故障的仓储包装
pub struct Probe<R> {
    inner: R,
    pub finds: AtomicUsize,
    pub saves: AtomicUsize,
    pub creates: AtomicUsize,
    pub updates: AtomicUsize,
    fail_find: AtomicBool,
    fail_save: AtomicBool,
}

impl<R> Probe<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            finds: AtomicUsize::new(0),
            saves: AtomicUsize::new(0),
            creates: AtomicUsize::new(0),
            updates: AtomicUsize::new(0),
            fail_find: AtomicBool::new(false),
            fail_save: AtomicBool::new(false),
        }
    }

    pub fn fail_find(&self) {
        self.fail_find.store(true, Ordering::SeqCst);
    }

    pub fn fail_save(&self) {
        self.fail_save.store(true, Ordering::SeqCst);
    }

    pub fn finds(&self) -> usize {
        self.finds.load(Ordering::SeqCst)
    }

    pub fn saves(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    pub fn creates(&self) -> usize {
        self.creates.load(Ordering::SeqCst)
    }

    pub fn updates(&self) -> usize {
        self.updates.load(Ordering::SeqCst)
    }
}

fn outage() -> DomainError {
    DomainError::Database {
        reason: "connection reset".to_string(),
    }
}

#[async_trait]
impl<T, R> Repository<T> for Probe<R>
where
    T: Entity,
    R: Repository<T>,
{
    async fn find(&self, criteria: &Criteria) -> DomainResult<Vec<T>> {
        self.finds.fetch_add(1, Ordering::SeqCst);
        if self.fail_find.load(Ordering::SeqCst) {
            return Err(outage());
        }
        self.inner.find(criteria).await
    }

    async fn save(&self, entities: Vec<T>, options: SaveOptions) -> DomainResult<Vec<T>> {
        self.saves.fetch_add(1, Ordering::SeqCst);
        if self.fail_save.load(Ordering::SeqCst) {
            return Err(outage());
        }
        self.inner.save(entities, options).await
    }

    async fn create(&self, draft: T) -> DomainResult<T> {
        self.creates.fetch_add(1, Ordering::SeqCst);
        self.inner.create(draft).await
    }

    async fn update(&self, criteria: &Criteria, patch: Patch) -> DomainResult<UpdateResult> {
        self.updates.fetch_add(1, Ordering::SeqCst);
        self.inner.update(criteria, patch).await
    }
}

/// 保存后逐条按标识重新读取，返回的实例不带任何关联值（类似 `RETURNING *`）
pub struct Reloading<R>(pub R);

#[async_trait]
impl<T, R> Repository<T> for Reloading<R>
where
    T: Entity,
    T::Id: serde::Serialize,
    R: Repository<T>,
{
    async fn find(&self, criteria: &Criteria) -> DomainResult<Vec<T>> {
        self.0.find(criteria).await
    }

    async fn save(&self, entities: Vec<T>, options: SaveOptions) -> DomainResult<Vec<T>> {
        let saved = self.0.save(entities, options).await?;

        let mut reloaded = Vec::with_capacity(saved.len());
        for entity in &saved {
            let row = self.0.find_by_id(entity.id()).await?.ok_or_else(|| {
                DomainError::NotFound {
                    reason: format!("{} {}", T::TYPE, entity.id()),
                }
            })?;
            reloaded.push(row);
        }
        Ok(reloaded)
    }

    async fn create(&self, draft: T) -> DomainResult<T> {
        self.0.create(draft).await
    }

    async fn update(&self, criteria: &Criteria, patch: Patch) -> DomainResult<UpdateResult> {
        self.0.update(criteria, patch).await
    }
}

/// 帖子/视频/评论/图片的完整装配，使用独立注册表避免测试间互相影响
pub struct Harness {
    pub registry: Arc<Registry>,
    pub manager: Arc<RepositoryManager>,
    pub post_store: Arc<InMemoryRepository<Post>>,
    pub video_store: Arc<InMemoryRepository<Video>>,
    pub comments: Arc<Probe<Arc<InMemoryRepository<Comment>>>>,
    pub images: Arc<Probe<Arc<InMemoryRepository<Image>>>>,
}

impl Harness {
    pub fn new() -> Self {
        init_tracing();

        let registry = Arc::new(Registry::new());
        registry.declare::<Post, Comment>("comments", Accessor::Many(|p| &mut p.comments));
        registry.declare::<Post, Image>("cover", Accessor::One(|p| &mut p.cover));
        registry.declare::<Video, Comment>("comments", Accessor::Many(|v| &mut v.comments));

        let manager = Arc::new(RepositoryManager::new());
        let comments = Arc::new(Probe::new(store::<Comment>()));
        let images = Arc::new(Probe::new(store::<Image>()));
        manager.register::<Comment, _>(comments.clone());
        manager.register::<Image, _>(images.clone());

        Self {
            registry,
            manager,
            post_store: store(),
            video_store: store(),
            comments,
            images,
        }
    }

    pub fn posts(&self) -> PolymorphicRepository<Post, Arc<InMemoryRepository<Post>>> {
        PolymorphicRepository::with_registry(
            self.post_store.clone(),
            self.manager.clone(),
            self.registry.clone(),
        )
    }

    /// 内部仓储保存后重新加载拥有者
    pub fn reloading_posts(
        &self,
    ) -> PolymorphicRepository<Post, Reloading<Arc<InMemoryRepository<Post>>>> {
        PolymorphicRepository::with_registry(
            Reloading(self.post_store.clone()),
            self.manager.clone(),
            self.registry.clone(),
        )
    }

    pub fn videos(&self) -> PolymorphicRepository<Video, Arc<InMemoryRepository<Video>>> {
        PolymorphicRepository::with_registry(
            self.video_store.clone(),
            self.manager.clone(),
            self.registry.clone(),
        )
    }
}
