pub(crate) fn report_error(error: &(dyn 'static + Error)) {
    let mut message = format!("Error: {error}");

    for (i, error) in error_chain(error).enumerate().skip(1) {
        if i == 1 {
            message.push_str("\n\nCaused by:");
        }
        write!(message, "\n{i:4}: {error}").unwrap();
    }

    eprintln!("{message}");
}

use std::error::Error;
use std::fmt::Write as _;

use error_chain::error_chain;
mod error_chain {
    pub(crate) fn error_chain<'error>(error: &'error (dyn 'static + Error)) -> Chain<'error> {
        Chain(Some(error))
    }

    pub(crate) struct Chain<'error>(Option<&'error (dyn 'static + Error)>);

    impl<'error> Iterator for Chain<'error> {
        type Item = &'error (dyn 'static + Error);

        fn next(&mut self) -> Option<Self::Item> {
            let current = self.0.take()?;
            self.0 = current.source();
            Some(current)
        }
    }

    #[test]
    fn follows_sources() {
        let error = anyhow::anyhow!("root").context("middle").context("top");
        let messages = error_chain(error.as_ref())
            .map(ToString::to_string)
            .collect::<Vec<_>>();
        assert_eq!(messages, ["top", "middle", "root"]);
    }

    use std::error::Error;
}
