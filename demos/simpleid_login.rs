//! Interactive SimpleID login walkthrough.
//!
//! The demo prints the authorize URL, waits for the user to paste the full callback URL the
//! browser was redirected to, then completes the login and prints the normalized profile.

// std
use std::io::{self, Write};
// crates.io
use color_eyre::{Result, eyre::eyre};
// self
use simpleid_oauth2::{
	auth::TokenGrant,
	error::BoxError,
	flows::{AuthOutcome, CallbackParams},
	provider::{Profile, SimpleIdConfig, SimpleIdStrategy},
	url::Url,
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let client_id = prompt_with_default("Enter your SimpleID client ID", Some("demo-client"))?;
	let client_secret = prompt_with_default("Enter your SimpleID client secret", Some("demo-secret"))?;
	let callback_url = prompt_with_default(
		"Enter the callback URL registered with SimpleID",
		Some("http://localhost:3000/auth/simpleid/callback"),
	)?;
	let config = SimpleIdConfig::builder(client_id, client_secret, callback_url)
		.scope(["profile", "email"])
		.build()?;
	let strategy = SimpleIdStrategy::new(config)?;
	let request = strategy.start_authorization(None);

	println!("Authorize URL: {}", &request.authorize_url);
	println!("After SimpleID redirects back, paste the full callback URL here.");

	let Some(returned) = prompt_optional("Callback URL (leave blank to stop here)")? else {
		return Ok(());
	};
	let returned = Url::parse(&returned)?;
	let callback = CallbackParams::from_query(returned.query().unwrap_or_default());
	let verify = |grant: TokenGrant, profile: Option<Profile>| async move {
		Ok::<_, BoxError>(profile.map(|profile| (profile, grant)))
	};

	match strategy.authenticate(&request, callback, &verify).await? {
		AuthOutcome::Success { user: (profile, grant), .. } => {
			println!("Signed in as {} ({:?}).", profile.id, profile.display_name);
			println!("Email: {}.", profile.email().unwrap_or("<none>"));
			println!("Token type: {}, expires at: {:?}.", grant.token_type, grant.expires_at);
			println!("{}", serde_json::to_string_pretty(&profile)?);
		},
		AuthOutcome::Failure { message } => return Err(eyre!("Login failed: {message}")),
	}

	Ok(())
}

fn prompt_with_default(label: &str, default: Option<&str>) -> Result<String> {
	let value = prompt_optional(&match default {
		Some(default) => format!("{label} [{default}]"),
		None => label.to_owned(),
	})?;

	match (value, default) {
		(Some(value), _) => Ok(value),
		(None, Some(default)) => Ok(default.to_owned()),
		(None, None) => Err(eyre!("{label} is required.")),
	}
}

fn prompt_optional(label: &str) -> Result<Option<String>> {
	print!("{label}: ");
	io::stdout().flush()?;

	let mut buf = String::new();

	io::stdin().read_line(&mut buf)?;

	let value = buf.trim();

	Ok(if value.is_empty() { None } else { Some(value.to_owned()) })
}
