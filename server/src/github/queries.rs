//! GraphQL documents sent to the GitHub v4 endpoint.

/// Repositories owned by the viewer, one page only.
pub const VIEWER_REPOSITORIES: &str = r#"
    query ViewerRepositories($first: Int!) {
        viewer {
            repositories(first: $first, ownerAffiliations: OWNER) {
                nodes {
                    name
                    diskUsage
                    owner {
                        login
                    }
                }
            }
        }
    }
"#;

/// Repository metadata plus the root tree, directories expanded one level.
pub const REPOSITORY_TREE: &str = r#"
    query RepositoryTree($name: String!, $expression: String!) {
        viewer {
            repository(name: $name) {
                id
                name
                diskUsage
                visibility
                owner {
                    login
                }
                object(expression: $expression) {
                    ... on Tree {
                        entries {
                            name
                            type
                            path
                            object {
                                ... on Tree {
                                    entries {
                                        name
                                        type
                                        path
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
"#;

/// Text of a single blob.
pub const FILE_CONTENT: &str = r#"
    query FileContent($name: String!, $expression: String!) {
        viewer {
            repository(name: $name) {
                object(expression: $expression) {
                    ... on Blob {
                        text
                    }
                }
            }
        }
    }
"#;
