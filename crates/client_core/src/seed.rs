use shared::domain::{ContentObject, Post, PostId};

/// Posts shown before the first fetch resolves, and kept when it fails.
pub fn seed_posts() -> Vec<Post> {
    vec![
        Post {
            id: PostId(42),
            title: ContentObject::rendered("Hello World"),
            content: ContentObject::rendered(
                "<p>Welcome to the reader. This post ships with the app and stays \
                 on screen until the live list arrives.</p>\n\
                 <p>Toggle the display mode to switch between the excerpt and the \
                 full body.</p>",
            ),
            excerpt: ContentObject::rendered("<p>Welcome to the reader.</p>"),
            date: "2019-04-22T10:15:00".to_string(),
        },
        Post {
            id: PostId(4000),
            title: ContentObject::rendered("Second Post"),
            content: ContentObject::rendered(
                "<p>A second bundled post, so the list view has more than one \
                 entry while offline.</p>",
            ),
            excerpt: ContentObject::rendered("<p>A second bundled post.</p>"),
            date: "2019-04-23T08:30:00".to_string(),
        },
    ]
}
