use proc_macro::TokenStream;
use quote::quote;
use syn::parse_macro_input;

/// Declares an agent tool from a parameter type and an async closure.
///
/// ```ignore
/// react_agent_rs::tool!(
///     name = "reverse_string",
///     description = "Reverses a string.",
///     params = ReverseParams,
///     |params: ReverseParams| async move { Ok(json!(params.text.chars().rev().collect::<String>())) }
/// );
/// ```
///
/// Expands to a unit struct named after `name` in PascalCase (`ReverseString`)
/// implementing `react_agent_rs::tools::Tool`. The parameter schema is derived
/// with `schemars`; incoming arguments are parsed with path-aware errors.
#[proc_macro]
pub fn tool(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as ToolDefinition);

    let name = input.name;
    let description = input.description;
    let params_type = input.params_type;
    let execute_body = input.execute_body;

    let tool_struct = quote::format_ident!("{}", pascal_case(&name.value()));

    let expanded = quote! {
        #[derive(Debug, Default, Clone, Copy)]
        pub struct #tool_struct;

        impl react_agent_rs::tools::Tool for #tool_struct {
            fn name(&self) -> &'static str {
                #name
            }

            fn description(&self) -> &'static str {
                #description
            }

            fn parameters_schema(&self) -> serde_json::Value {
                let schema = schemars::schema_for!(#params_type);
                serde_json::to_value(&schema.schema).unwrap_or_else(|_| {
                    serde_json::json!({
                        "type": "object",
                        "properties": {}
                    })
                })
            }

            fn execute(
                &self,
                parameters: serde_json::Value,
            ) -> std::pin::Pin<
                Box<
                    dyn std::future::Future<Output = react_agent_rs::Result<serde_json::Value>>
                        + Send
                        + '_,
                >,
            > {
                Box::pin(async move {
                    let params: #params_type =
                        react_agent_rs::schemas::validator::parse_params(#name, parameters)?;

                    let handler = #execute_body;
                    handler(params)
                        .await
                        .map_err(react_agent_rs::AgentError::ToolExecution)
                })
            }
        }
    };

    TokenStream::from(expanded)
}

fn pascal_case(name: &str) -> String {
    name.split(['_', '-'])
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect()
}

struct ToolDefinition {
    name: syn::LitStr,
    description: syn::LitStr,
    params_type: syn::Type,
    execute_body: syn::ExprClosure,
}

fn parse_named_assignment<T: syn::parse::Parse>(
    input: syn::parse::ParseStream,
    keyword: &str,
) -> syn::Result<T> {
    let ident: syn::Ident = input.parse()?;
    if ident != keyword {
        return Err(syn::Error::new_spanned(
            ident,
            format!("expected '{keyword}'"),
        ));
    }
    input.parse::<syn::Token![=]>()?;
    let value = input.parse::<T>()?;
    input.parse::<syn::Token![,]>()?;
    Ok(value)
}

impl syn::parse::Parse for ToolDefinition {
    fn parse(input: syn::parse::ParseStream) -> syn::Result<Self> {
        let name = parse_named_assignment::<syn::LitStr>(input, "name")?;
        if name.value().is_empty() {
            return Err(syn::Error::new_spanned(name, "tool name must not be empty"));
        }
        let description = parse_named_assignment::<syn::LitStr>(input, "description")?;
        let params_type = parse_named_assignment::<syn::Type>(input, "params")?;
        let execute_body: syn::ExprClosure = input.parse()?;
        // allow a trailing comma after the closure
        let _ = input.parse::<Option<syn::Token![,]>>()?;

        Ok(ToolDefinition {
            name,
            description,
            params_type,
            execute_body,
        })
    }
}
