use minijinja::{context, Environment};

use crate::course::Course;

/// Jinja-style HTML pages, compiled into the binary and rendered per request.
pub struct Templates {
    env: Environment<'static>,
}

impl Templates {
    pub fn new() -> Result<Self, minijinja::Error> {
        let mut env = Environment::new();
        env.add_template("home.html", include_str!("../templates/home.html"))?;
        env.add_template("result.html", include_str!("../templates/result.html"))?;
        Ok(Self { env })
    }

    pub fn render_home(&self) -> Result<String, minijinja::Error> {
        self.env.get_template("home.html")?.render(context! {})
    }

    pub fn render_results(
        &self,
        data: &[Course],
        result: usize,
    ) -> Result<String, minijinja::Error> {
        self.env
            .get_template("result.html")?
            .render(context! { data => data, result => result })
    }
}
