use std::hint::black_box;
use std::sync::Arc;

use criterion::{Criterion, criterion_group, criterion_main};

use board::model::{CreatePost, CreateProfile, PostFilter, ReactionKind};
use board::service::{BoardConfig, BoardService};
use board::{Identity, JwtIdentity};
use dearbaby_core::Page;
use dearbaby_sql::SqliteStore;

fn board_with_posts(n: usize) -> (Arc<BoardService>, Vec<String>) {
    let sql = Arc::new(SqliteStore::open_in_memory().unwrap());
    let identity = Arc::new(JwtIdentity::new("bench", None));
    let svc = BoardService::new(sql, identity, BoardConfig::default()).unwrap();

    // Reactions reference users, so the viewer needs a profile too.
    for (id, name) in [("author", "Author"), ("viewer", "Viewer")] {
        let who = Identity {
            id: id.into(),
            email: Some(format!("{}@example.com", id)),
        };
        svc.create_profile(
            &who,
            CreateProfile {
                name: Some(name.into()),
                ..Default::default()
            },
        )
        .unwrap();
    }

    let ids = (0..n)
        .map(|i| {
            svc.create_post(CreatePost {
                title: Some(format!("post {}", i)),
                content: Some(format!("body of post {} about rust", i)),
                author_id: Some("author".into()),
            })
            .unwrap()
            .post
            .id
        })
        .collect();
    (svc, ids)
}

fn bench_reaction_toggle(c: &mut Criterion) {
    let (svc, ids) = board_with_posts(1);
    let post = &ids[0];

    // Alternating like/dislike exercises the replace path every iteration.
    let mut kind = ReactionKind::Like;
    c.bench_function("reaction_toggle", |b| {
        b.iter(|| {
            svc.set_reaction(black_box(post), Some("viewer".into()), kind).unwrap();
            kind = kind.opposite();
        });
    });
}

fn bench_list_posts(c: &mut Criterion) {
    let (svc, _) = board_with_posts(1000);

    let plain = PostFilter {
        page: Page::new(Some(3), Some(20), 10, 100),
        search: None,
        viewer: None,
    };
    c.bench_function("list_posts_page", |b| {
        b.iter(|| black_box(svc.list_posts(&plain).unwrap()));
    });

    let searched = PostFilter {
        search: Some("rust".into()),
        viewer: Some("viewer".into()),
        ..plain
    };
    c.bench_function("list_posts_search_viewer", |b| {
        b.iter(|| black_box(svc.list_posts(&searched).unwrap()));
    });
}

criterion_group!(benches, bench_reaction_toggle, bench_list_posts);
criterion_main!(benches);
