use quill_types::Post;

/// How a post becomes a file name and file contents
#[derive(Debug, Clone)]
pub struct DocumentTemplate {
    pub filename_template: String,
    pub content_template: String,
}

impl Default for DocumentTemplate {
    fn default() -> Self {
        Self {
            filename_template: "post {id}.txt".to_string(),
            content_template: "TITLE: {title}\n\nBODY:\n{body}".to_string(),
        }
    }
}

impl DocumentTemplate {
    pub fn new(filename: String, content: String) -> Self {
        Self {
            filename_template: filename,
            content_template: content,
        }
    }

    pub fn format_filename(&self, post: &Post) -> String {
        fill(&self.filename_template, post)
    }

    pub fn format_content(&self, post: &Post) -> String {
        fill(&self.content_template, post)
    }
}

fn fill(template: &str, post: &Post) -> String {
    template
        .replace("{id}", &post.id.to_string())
        .replace("{title}", &post.title)
        .replace("{body}", &post.body)
}
