//! Steps web incluidos.

use testflow_core::declare_step;
use testflow_core::errors::CoreError;

use crate::driver::driver_mut;

declare_step! {
    step OpenUrlStep {
        name: "open_url",
        output: (),
        fields { url: Option<String> },
        required [url],
        run(this, ctx) {
            let url = this.url
                          .clone()
                          .ok_or_else(|| CoreError::StepExecution("open_url without url".to_string()))?;
            driver_mut(ctx)?.navigate(&url)
        }
    }
}

declare_step! {
    step ReadUrlStep {
        name: "read_url",
        output: String,
        run(_this, ctx) {
            Ok(driver_mut(ctx)?.current_url().unwrap_or_default())
        }
    }
}

declare_step! {
    step QuitDriverStep {
        name: "quit_driver",
        output: (),
        run(_this, ctx) {
            driver_mut(ctx)?.quit()
        }
    }
}
