//! Unit tests for binding tokens to arguments

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "This is a test module")]
mod tests {
    use anyhow::anyhow;
    use argspec::{
        ArgError, ArgOptions, ArgumentList, Choices, from_str, optional, required, rest, string,
    };
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn tokens(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|token| (*token).to_owned()).collect()
    }

    fn arg_error(err: &anyhow::Error) -> Option<&ArgError> {
        err.downcast_ref::<ArgError>()
    }

    #[tokio::test]
    async fn binds_required_and_optional_in_order() {
        let list = ArgumentList::new(vec![
            required("a"),
            required("b"),
            optional("c"),
            string()
                .optional(ArgOptions::<String>::named("d").default_value("fallback".to_owned())),
            optional("e"),
        ])
        .unwrap();

        let bound = list.bind(tokens(&["x", "y", "z"])).await.unwrap();

        assert_eq!(bound.len(), 5);
        assert_eq!(bound.value_of::<String>("a").map(String::as_str), Some("x"));
        assert_eq!(bound.value_of::<String>("b").map(String::as_str), Some("y"));
        assert_eq!(bound.value_of::<String>("c").map(String::as_str), Some("z"));
        assert_eq!(bound.value_of::<String>("d").map(String::as_str), Some("fallback"));
        assert!(!bound.is_present(4));
        assert_eq!(bound.get::<String>(4), None);
    }

    #[tokio::test]
    async fn missing_required_names_exactly_the_unfilled_arguments() {
        let list = ArgumentList::new(vec![
            required("src"),
            required("dest"),
            required("mode"),
            optional("extra"),
        ])
        .unwrap();

        let err = list.bind(tokens(&["only-src"])).await.unwrap_err();
        assert_eq!(
            arg_error(&err),
            Some(&ArgError::missing_required(vec![
                "<DEST>".to_owned(),
                "<MODE>".to_owned()
            ]))
        );
        assert_eq!(err.to_string(), "Missing required arguments: <DEST>, <MODE>");
    }

    #[tokio::test]
    async fn default_satisfies_a_required_argument() {
        let list = ArgumentList::new(vec![
            string()
                .required(ArgOptions::<String>::named("target").default_value("debug".to_owned())),
        ])
        .unwrap();

        let bound = list.bind(Vec::new()).await.unwrap();
        assert_eq!(bound.get::<String>(0).map(String::as_str), Some("debug"));
    }

    #[tokio::test]
    async fn excess_tokens_are_reported_in_order() {
        let list = ArgumentList::new(vec![required("a"), optional("b")]).unwrap();

        let err = list.bind(tokens(&["x", "y", "z", "w"])).await.unwrap_err();
        assert_eq!(
            arg_error(&err),
            Some(&ArgError::unexpected_arguments(vec!["z".to_owned(), "w".to_owned()]))
        );
    }

    #[tokio::test]
    async fn no_arguments_rejects_any_token() {
        let err = ArgumentList::empty()
            .bind(tokens(&["stray"]))
            .await
            .unwrap_err();
        assert_eq!(
            arg_error(&err),
            Some(&ArgError::unexpected_arguments(vec!["stray".to_owned()]))
        );
    }

    #[tokio::test]
    async fn rest_collects_every_remaining_token() {
        let list = ArgumentList::new(vec![required("a"), rest("b")]).unwrap();

        let bound = list.bind(tokens(&["x", "y", "z"])).await.unwrap();
        assert_eq!(bound.value_of::<String>("a").map(String::as_str), Some("x"));
        assert_eq!(bound.values_of::<String>("b"), vec!["y", "z"]);
        assert_eq!(bound.len(), 3);
    }

    #[tokio::test]
    async fn rest_accepts_zero_tokens() {
        let list = ArgumentList::new(vec![required("a"), rest("b")]).unwrap();

        let bound = list.bind(tokens(&["x"])).await.unwrap();
        assert!(bound.get_many::<String>(1).is_empty());
        assert!(!bound.is_present(1));
        assert_eq!(bound.len(), 1);
        assert_eq!(bound.slot_count(), 2);

        let err = list.bind(Vec::new()).await.unwrap_err();
        assert_eq!(
            arg_error(&err),
            Some(&ArgError::missing_required(vec!["<A>".to_owned()]))
        );
    }

    #[tokio::test]
    async fn choices_reject_unknown_tokens() {
        let list = ArgumentList::new(vec![required(
            ArgOptions::<String>::named("mode").choices(["a", "b"]),
        )])
        .unwrap();

        let err = list.bind(tokens(&["c"])).await.unwrap_err();
        assert_eq!(
            arg_error(&err),
            Some(&ArgError::invalid_choice(
                "<MODE>",
                "c",
                vec!["a".to_owned(), "b".to_owned()]
            ))
        );

        let bound = list.bind(tokens(&["a"])).await.unwrap();
        assert_eq!(bound.get::<String>(0).map(String::as_str), Some("a"));
    }

    #[tokio::test]
    async fn choices_are_checked_before_parsing() {
        let list = ArgumentList::new(vec![from_str::<i32>().required(
            ArgOptions::<i32>::named("level").choices(["1", "2"]),
        )])
        .unwrap();

        let err = list.bind(tokens(&["x"])).await.unwrap_err();
        assert!(matches!(arg_error(&err), Some(ArgError::InvalidChoice { .. })));

        let bound = list.bind(tokens(&["2"])).await.unwrap();
        assert_eq!(bound.get::<i32>(0), Some(&2));
    }

    #[tokio::test]
    async fn every_rest_token_is_checked_against_choices() {
        let list = ArgumentList::new(vec![rest(
            ArgOptions::<String>::named("features").choices(["tls", "json"]),
        )])
        .unwrap();

        assert!(list.bind(tokens(&["tls", "json"])).await.is_ok());

        let err = list.bind(tokens(&["tls", "yaml"])).await.unwrap_err();
        assert!(err.to_string().contains("'yaml'"));
    }

    #[tokio::test]
    async fn lazy_choices_are_resolved_at_every_bind() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let choices = Choices::lazy_async(move || {
            let counter = Arc::clone(&counter);
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(vec!["stable".to_owned(), "nightly".to_owned()])
            }
        });

        let list = ArgumentList::new(vec![required(
            ArgOptions::<String>::named("channel").choices(choices),
        )])
        .unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        list.bind(tokens(&["stable"])).await.unwrap();
        list.bind(tokens(&["nightly"])).await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);

        // No token, nothing to check
        let _ = list.bind(Vec::new()).await;
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn zero_and_empty_values_count_as_present() {
        let list =
            ArgumentList::new(vec![from_str::<i64>().required("count"), required("label")])
                .unwrap();

        let bound = list.bind(tokens(&["0", ""])).await.unwrap();
        assert_eq!(bound.get::<i64>(0), Some(&0));
        assert_eq!(bound.get::<String>(1).map(String::as_str), Some(""));
        assert!(bound.is_present(0));
        assert!(bound.is_present(1));
    }

    #[tokio::test]
    async fn default_resolving_to_none_leaves_the_slot_empty() {
        let list = ArgumentList::new(vec![string().optional(
            ArgOptions::<String>::named("token").default_with(|| async { Ok(None) }),
        )])
        .unwrap();

        let bound = list.bind(Vec::new()).await.unwrap();
        assert!(!bound.is_present(0));
        assert_eq!(bound.len(), 1);
    }

    #[tokio::test]
    async fn failing_default_supplier_propagates() {
        let list = ArgumentList::new(vec![string().optional(
            ArgOptions::<String>::named("token")
                .default_with(|| async { Err(anyhow!("keyring locked")) }),
        )])
        .unwrap();

        let err = list.bind(Vec::new()).await.unwrap_err();
        assert_eq!(err.to_string(), "keyring locked");
    }

    #[tokio::test]
    async fn parse_errors_propagate_unchanged() {
        let list = ArgumentList::new(vec![from_str::<u8>().required("port")]).unwrap();

        let err = list.bind(tokens(&["300"])).await.unwrap_err();
        assert!(arg_error(&err).is_none());
        assert!(err.to_string().starts_with("invalid value '300'"));
    }

    #[tokio::test]
    async fn async_parse_functions_are_awaited() {
        let lengths = from_str::<usize>().extend(
            ArgOptions::new().parse_async(|raw: String| async move { Ok(raw.chars().count()) }),
        );
        let list = ArgumentList::new(vec![lengths.required("word")]).unwrap();

        let bound = list.bind(tokens(&["héllo"])).await.unwrap();
        assert_eq!(bound.get::<usize>(0), Some(&5));
    }

    #[tokio::test]
    async fn typed_access_rejects_the_wrong_type() {
        let list = ArgumentList::new(vec![from_str::<u32>().required("n")]).unwrap();
        let bound = list.bind(tokens(&["7"])).await.unwrap();

        assert_eq!(bound.get::<u32>(0), Some(&7));
        assert_eq!(bound.get::<i64>(0), None);
        assert_eq!(bound.value_of::<u32>("missing"), None);
    }
}
